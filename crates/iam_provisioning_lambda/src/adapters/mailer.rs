use crate::runtime::error::ProvisioningError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub source: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
}

pub trait Mailer {
    fn send_text_email(&self, email: &OutboundEmail) -> Result<(), ProvisioningError>;
}
