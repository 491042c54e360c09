use qrcode::QrCode;
use qrcode::render::svg;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_PAYEE_NAME: &str = "SIP Calculator Donation";

const QR_MIN_DIMENSION: u32 = 200;

#[derive(Debug, Error)]
pub enum DonationError {
    #[error("payment URI cannot be encoded as a QR code: {0:?}")]
    QrEncoding(qrcode::types::QrError),
}

/// Static "support us" prompt: a UPI payee, its payment URI and the QR
/// code for that URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationPrompt {
    pub upi_id: String,
    pub payee_name: String,
}

impl DonationPrompt {
    /// Returns `None` when no UPI id is configured.
    pub fn from_config(upi_id: Option<&str>) -> Option<Self> {
        let upi_id = upi_id.map(str::trim).filter(|id| !id.is_empty())?;
        Some(Self {
            upi_id: upi_id.to_string(),
            payee_name: DEFAULT_PAYEE_NAME.to_string(),
        })
    }

    pub fn payment_uri(&self) -> String {
        format!(
            "upi://pay?pa={}&pn={}",
            urlencoding::encode(&self.upi_id),
            urlencoding::encode(&self.payee_name)
        )
    }

    pub fn qr_code(&self) -> Result<QrCode, DonationError> {
        QrCode::new(self.payment_uri().as_bytes()).map_err(DonationError::QrEncoding)
    }

    /// Renders the payment URI as a scannable SVG document.
    pub fn qr_svg(&self) -> Result<String, DonationError> {
        let svg = self
            .qr_code()?
            .render::<svg::Color<'_>>()
            .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
            .build();
        Ok(svg)
    }
}
