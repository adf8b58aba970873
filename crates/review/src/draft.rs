use revu_core::Rating;
use revu_ocr::{LineItem, ReceiptScan};
use serde::{Deserialize, Serialize};

/// The menu item being reviewed, as handed over by the calling screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuContext {
    pub menu_id: i64,
    pub menu_name: String,
    /// The brand the receipt is expected to come from.
    pub brand_name: String,
    pub image_url: Option<String>,
}

/// An uploaded receipt photo and what the engine made of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptAttachment {
    pub image_url: String,
    pub scan: Option<ReceiptScan>,
}

impl ReceiptAttachment {
    pub fn is_verified(&self) -> bool {
        self.scan.is_some()
    }
}

/// A review being composed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub menu: MenuContext,
    pub rating: Rating,
    pub content: String,
    pub taste: String,
    pub amount: String,
    pub would_visit_again: String,
    pub image_urls: Vec<String>,
    /// Latest receipt that verified against the menu's brand.
    pub receipt: Option<ReceiptScan>,
}

impl ReviewDraft {
    pub fn new(menu: MenuContext) -> Self {
        Self {
            menu,
            rating: Rating::default(),
            content: String::new(),
            taste: String::new(),
            amount: String::new(),
            would_visit_again: String::new(),
            image_urls: Vec::new(),
            receipt: None,
        }
    }

    /// Keep the uploaded photo; a verified scan replaces any earlier one, an
    /// unverified one leaves it in place.
    pub fn attach(&mut self, attachment: ReceiptAttachment) {
        self.image_urls.push(attachment.image_url);
        if let Some(scan) = attachment.scan {
            self.receipt = Some(scan);
        }
    }

    pub fn into_submission(self, user_id: impl Into<String>) -> ReviewSubmission {
        let (store_name, products) = match self.receipt {
            Some(scan) => (Some(scan.store_name), scan.products),
            None => (None, Vec::new()),
        };
        ReviewSubmission {
            menu_id: self.menu.menu_id,
            user_id: user_id.into(),
            review_content: self.content,
            review_rating: self.rating,
            taste: self.taste,
            amount: self.amount,
            would_visit_again: self.would_visit_again,
            image_urls: self.image_urls,
            store_name,
            products,
        }
    }
}

/// Payload accepted by the review API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub menu_id: i64,
    pub user_id: String,
    pub review_content: String,
    pub review_rating: Rating,
    pub taste: String,
    pub amount: String,
    pub would_visit_again: String,
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<LineItem>,
}
