//! Default catalog data inserted at startup

use common::error::StoreResult;
use common::models::{NewMessageTemplate, NewServiceCategory, TemplateFilter};
use tracing::info;

use crate::storage::Storage;

fn default_categories() -> Vec<NewServiceCategory> {
    [
        (
            "Cuts",
            "Professional haircuts and styling",
            "Scissors",
            "from-cyan-500 to-blue-500",
        ),
        (
            "Colors",
            "Hair coloring and highlighting",
            "Palette",
            "from-purple-500 to-pink-500",
        ),
        (
            "Treatments",
            "Deep conditioning and repair treatments",
            "Sparkles",
            "from-green-500 to-emerald-500",
        ),
        (
            "Styling",
            "Special event and everyday styling",
            "Wand2",
            "from-orange-500 to-red-500",
        ),
    ]
    .into_iter()
    .map(|(name, description, icon, color)| NewServiceCategory {
        name: name.to_string(),
        description: Some(description.to_string()),
        icon: Some(icon.to_string()),
        color: Some(color.to_string()),
    })
    .collect()
}

fn default_templates() -> Vec<NewMessageTemplate> {
    [
        (
            "Consultation Request",
            "Hi! I'd like to schedule a consultation to discuss my hair goals. When would be a good time for you?",
            "consultation",
        ),
        (
            "Booking Confirmation",
            "Your appointment is confirmed for {date} at {time}. Please arrive 10 minutes early. Looking forward to seeing you!",
            "booking_confirmation",
        ),
        (
            "Aftercare Instructions",
            "Thank you for choosing our services! Here are some tips to maintain your new look: {instructions}",
            "aftercare",
        ),
        (
            "Follow-up",
            "How are you loving your new hair? I'd love to see how it's holding up! Feel free to reach out if you have any questions.",
            "follow_up",
        ),
    ]
    .into_iter()
    .map(|(name, content, category)| NewMessageTemplate {
        hairstylist_id: None,
        name: name.to_string(),
        content: content.to_string(),
        category: Some(category.to_string()),
        is_default: Some(true),
    })
    .collect()
}

/// Insert the default categories and message templates.
///
/// Each group is only inserted when the store holds none of it yet, so
/// restarting against a persistent backend does not duplicate rows.
pub async fn seed_defaults(storage: &dyn Storage) -> StoreResult<()> {
    if storage.list_categories().await?.is_empty() {
        for category in default_categories() {
            storage.create_category(category).await?;
        }
        info!("Seeded default service categories");
    }

    let has_defaults = storage
        .list_templates(&TemplateFilter::default())
        .await?
        .iter()
        .any(|template| template.is_default);
    if !has_defaults {
        for template in default_templates() {
            storage.create_template(template).await?;
        }
        info!("Seeded default message templates");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let storage = MemoryStorage::new();
        seed_defaults(&storage).await.unwrap();
        seed_defaults(&storage).await.unwrap();

        let categories = storage.list_categories().await.unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cuts", "Colors", "Treatments", "Styling"]);

        let templates = storage
            .list_templates(&TemplateFilter::default())
            .await
            .unwrap();
        assert_eq!(templates.len(), 4);
        assert!(templates.iter().all(|t| t.is_default && t.hairstylist_id.is_none()));
    }

    #[tokio::test]
    async fn test_defaults_visible_to_every_provider() {
        let storage = MemoryStorage::new();
        seed_defaults(&storage).await.unwrap();

        let templates = storage
            .list_templates(&TemplateFilter {
                hairstylist_id: Some("any-stylist".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(templates.len(), 4);
    }
}
