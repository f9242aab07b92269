//! Profile scan pipeline
//!
//! Fetch public details for profiles first seen as comment authors. Each
//! profile is one task; every outcome is audited against the account whose
//! token was used.

use super::context::ScanContext;
use super::service::{audit, ScanService};
use crate::modules::facebook::domain::{Education, EntityNameId, UserProfile, Work};
use crate::modules::facebook::ContentSource;
use crate::modules::scan::domain::{
    ActionLogEntry, ProfileScanUpdate, ProfileToScan, ScanAction, ScanRepository,
};
use crate::modules::settings::ScanSettings;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::TimedOperation;
use crate::shared::TaskPool;
use crate::{log_error, log_info, log_warn};
use std::sync::Arc;

impl ScanService {
    /// Scan the details of profiles due for a rescan
    pub async fn scan_all_profiles(&self) {
        let timer = TimedOperation::new("scan_all_profiles");
        let settings = ScanSettings::resolve(self.settings.as_ref()).await;
        let ctx = ScanContext::new(&self.shutdown, settings.deadline);
        log_info!("Starting profile scan run {}", ctx.run_id());

        let profiles = match self
            .repository
            .get_profiles_to_scan(settings.profile_scan_limit)
            .await
        {
            Ok(profiles) => profiles,
            Err(e) => {
                log_error!("Failed to fetch profiles to scan: {}", e);
                return;
            }
        };
        log_info!("Fetched {} profiles to scan", profiles.len());

        let pool = TaskPool::new(settings.profile_concurrency);
        for profile in &profiles {
            let repository = Arc::clone(&self.repository);
            let content = Arc::clone(&self.content);
            let ctx = ctx.clone();
            pool.submit(
                move |profile| async move {
                    process_profile(&ctx, repository.as_ref(), content.as_ref(), profile).await
                },
                profile.clone(),
            );
        }
        let (results, errors) = pool.run().await;

        let mut succeeded = 0;
        for (i, err) in errors.iter().enumerate() {
            let profile = &profiles[i];
            match err {
                Some(err) => {
                    log_error!("Failed to process profile {}: {}", profile.id, err);
                    audit(
                        self.repository.as_ref(),
                        ActionLogEntry::new(
                            profile.account_id,
                            ScanAction::ScanProfile,
                            format!("scan profile {} failed: {}", profile.id, err),
                        )
                        .with_target(profile.id),
                    )
                    .await;
                }
                None if results[i] => {
                    succeeded += 1;
                    audit(
                        self.repository.as_ref(),
                        ActionLogEntry::new(
                            profile.account_id,
                            ScanAction::ScanProfile,
                            format!("scanned profile {} successfully", profile.id),
                        )
                        .with_target(profile.id),
                    )
                    .await;
                }
                None => {}
            }
        }

        timer.finish_with_info(&format!(
            "run {}: {}/{} profiles, {:?} left before deadline",
            ctx.run_id(),
            succeeded,
            profiles.len(),
            ctx.remaining()
        ));
    }
}

/// Fetch one profile's details and store them
///
/// A failed fetch touches the scan-attempt marker before failing, so the
/// profile moves behind the rest of the queue.
async fn process_profile(
    ctx: &ScanContext,
    repository: &dyn ScanRepository,
    content: &dyn ContentSource,
    profile: ProfileToScan,
) -> AppResult<bool> {
    ctx.ensure_active()?;

    let fetched = match profile.access_token.as_deref() {
        Some(token) if !token.is_empty() => {
            content
                .fetch_profile_details(&profile.facebook_id, token)
                .await
        }
        _ => Err(AppError::Unauthorized(format!(
            "Account {} does not have an access token",
            profile.account_id
        ))),
    };

    let details = match fetched {
        Ok(details) => details,
        Err(e) => {
            if let Err(touch_err) = repository.touch_profile_scan_attempt(profile.id).await {
                log_warn!(
                    "Failed to record scan attempt for profile {}: {}",
                    profile.id,
                    touch_err
                );
            }
            return Err(e);
        }
    };

    repository
        .update_profile_after_scan(profile.id, profile_update(&details))
        .await?;
    Ok(true)
}

pub(crate) fn profile_update(details: &UserProfile) -> ProfileScanUpdate {
    ProfileScanUpdate {
        bio: details.about.clone(),
        email: details.email.clone(),
        location: entity_name(details.location.as_ref()),
        hometown: entity_name(details.hometown.as_ref()),
        birthday: details.birthday.clone(),
        gender: details.gender.clone(),
        relationship_status: details.relationship_status.clone(),
        work: details.work.as_deref().and_then(join_work),
        education: details.education.as_deref().and_then(join_education),
        profile_url: details.link.clone(),
        locale: details.locale.clone(),
    }
}

fn entity_name(entity: Option<&EntityNameId>) -> Option<String> {
    entity.and_then(|e| e.name.clone())
}

/// `"Employer - Position; Employer"`; entries without an employer are dropped
pub fn join_work(work: &[Work]) -> Option<String> {
    let parts: Vec<String> = work
        .iter()
        .filter_map(|w| {
            let employer = w.employer.as_ref()?.name.as_deref()?;
            Some(match w.position.as_ref().and_then(|p| p.name.as_deref()) {
                Some(position) => format!("{} - {}", employer, position),
                None => employer.to_string(),
            })
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join("; "))
}

/// `"School; School"`; entries without a school name are dropped
pub fn join_education(education: &[Education]) -> Option<String> {
    let parts: Vec<&str> = education
        .iter()
        .filter_map(|e| e.school.as_ref()?.name.as_deref())
        .collect();

    (!parts.is_empty()).then(|| parts.join("; "))
}
