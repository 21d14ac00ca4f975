use serde::{Deserialize, Serialize};

/// Image metadata as the backend stores it (url plus dimensions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinPicture {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub meta: Option<PictureMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictureMeta {
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "creditCard")]
    CreditCard,
    #[serde(rename = "bankTransfer")]
    BankTransfer,
    #[serde(rename = "payPal")]
    PayPal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingDetails {
    pub id: i64,
    #[serde(default)]
    pub company_id: String,
    #[serde(default)]
    pub billing_email: String,
    #[serde(default)]
    pub billing_address: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub contact_person: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub billing_address: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub employees: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub amount_reviews: i64,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub logo: Option<MinPicture>,
    #[serde(default)]
    pub banner: Option<MinPicture>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub social_media: Option<Vec<SocialMedia>>,
    #[serde(default)]
    pub billing_details: Option<BillingDetails>,
}
