//! Partnerships between brokers, across or within companies
//!
//! A partnership is proposed when one broker's open lead matches another
//! broker's available property. The lead owner is the sender, the property
//! owner the receiver.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::notification_service::NotificationService;
use super::settings_service::effective_settings;
use super::Actor;
use crate::domain::{
    Lead, NewNotification, NotificationKind, PartnershipNotification, PartnershipStatus, Property,
};
use crate::error::DomainError;
use crate::matching::{evaluate, LeadCriteria};
use crate::repositories::{LeadRepository, PartnershipRepository, PropertyRepository, SettingsRepository};

#[derive(Clone)]
pub struct PartnershipService {
    repo: Arc<dyn PartnershipRepository>,
    lead_repo: Arc<dyn LeadRepository>,
    property_repo: Arc<dyn PropertyRepository>,
    settings_repo: Arc<dyn SettingsRepository>,
    notifications: NotificationService,
}

impl PartnershipService {
    pub fn new(
        repo: Arc<dyn PartnershipRepository>,
        lead_repo: Arc<dyn LeadRepository>,
        property_repo: Arc<dyn PropertyRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            repo,
            lead_repo,
            property_repo,
            settings_repo,
            notifications,
        }
    }

    /// Records a partnership for an already matched pair. Returns whether a
    /// new one was created; existing pairs and same-broker pairs are skipped.
    pub async fn record(&self, lead: &Lead, property: &Property) -> Result<bool, DomainError> {
        if lead.user_id == property.user_id {
            return Ok(false);
        }

        let partnership = PartnershipNotification::new(
            lead.id,
            property.id,
            lead.user_id,
            property.user_id,
            format!("Lead \"{}\" matches your property \"{}\"", lead.name, property.title),
        );
        if !self.repo.insert_if_absent(&partnership).await? {
            return Ok(false);
        }
        info!(
            "Partnership {} proposed: lead {} / property {}",
            partnership.id, lead.id, property.id
        );

        let to_receiver = NewNotification::new(
            property.company_id,
            property.user_id,
            NotificationKind::Partnership,
            "New partnership opportunity",
            partnership.message.clone(),
        )
        .lead(lead.id)
        .property(property.id);
        let to_sender = NewNotification::new(
            lead.company_id,
            lead.user_id,
            NotificationKind::Partnership,
            "Partner property found",
            format!("Property \"{}\" from another broker matches lead \"{}\"", property.title, lead.name),
        )
        .lead(lead.id)
        .property(property.id);

        for notification in [to_receiver, to_sender] {
            if let Err(e) = self.notifications.notify_once(notification).await {
                warn!("Failed to send partnership notification: {}", e);
            }
        }
        Ok(true)
    }

    /// Scans the actor's open leads against every shared property and
    /// returns how many new partnerships were recorded.
    pub async fn detect_for_user(&self, actor: &Actor) -> Result<usize, DomainError> {
        let settings =
            effective_settings(self.settings_repo.as_ref(), &actor.user_id, &actor.company_id).await?;
        if !settings.partnerships_enabled {
            info!("Partnerships disabled for user {}, skipping detection", actor.user_id);
            return Ok(0);
        }

        let leads = self.lead_repo.list_open_by_user(&actor.user_id).await?;
        if leads.is_empty() {
            return Ok(0);
        }
        let properties = self.property_repo.list_shared_available(&actor.user_id).await?;

        let mut created = 0;
        for lead in &leads {
            let criteria = LeadCriteria::from(lead);
            for property in properties.iter().filter(|p| evaluate(&criteria, p).is_match()) {
                match self.record(lead, property).await {
                    Ok(true) => created += 1,
                    Ok(false) => {}
                    Err(e) => warn!("Partnership for lead {} / property {} failed: {}", lead.id, property.id, e),
                }
            }
        }

        info!("Partnership detection for user {}: {} new", actor.user_id, created);
        Ok(created)
    }

    pub async fn list_for_user(&self, actor: &Actor) -> Result<Vec<PartnershipNotification>, DomainError> {
        self.repo.list_for_user(&actor.user_id).await
    }

    /// Only the receiving broker may answer, and only once.
    pub async fn respond(&self, actor: &Actor, id: &Uuid, accept: bool) -> Result<PartnershipNotification, DomainError> {
        let mut partnership = self.repo.find_by_id(id).await?
            .filter(|p| p.involves(actor.user_id))
            .ok_or(DomainError::NotFound("Partnership"))?;

        if partnership.to_user_id != actor.user_id {
            return Err(DomainError::Forbidden("Only the property broker can respond".to_string()));
        }
        if partnership.status != PartnershipStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Partnership already {}",
                partnership.status.as_str()
            )));
        }

        partnership.respond(accept);
        let updated = self.repo.update(&partnership).await?;
        info!("Partnership {} {}", updated.id, updated.status.as_str());

        match self.lead_repo.find_by_id(&updated.lead_id).await {
            Ok(Some(lead)) => {
                let verdict = if accept { "accepted" } else { "rejected" };
                let notification = NewNotification::new(
                    lead.company_id,
                    updated.from_user_id,
                    NotificationKind::PartnershipResponse,
                    format!("Partnership {}", verdict),
                    format!("Your partnership request for lead \"{}\" was {}", lead.name, verdict),
                )
                .lead(updated.lead_id)
                .property(updated.property_id);
                if let Err(e) = self.notifications.notify_once(notification).await {
                    warn!("Failed to notify partnership sender: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to load lead {} for partnership reply: {}", updated.lead_id, e),
        }

        Ok(updated)
    }
}
