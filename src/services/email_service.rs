// services/email_service.rs
use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::errors::{AppError, Result};
use crate::models::trip::TripRecord;

/// SMTP notifier. Callers hand sends off with `tokio::spawn` and move
/// on; a failed delivery is logged, never surfaced to the end user.
#[derive(Clone)]
pub struct EmailService {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailService {
    pub fn new(smtp_server: &str, smtp_port: u16, user: &str, password: &str) -> Result<Self> {
        let from = user
            .parse::<Mailbox>()
            .map_err(|e| AppError::Mail(format!("Invalid sender address {}: {}", user, e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_server)
            .map_err(|e| AppError::Mail(format!("SMTP relay setup failed: {}", e)))?
            .port(smtp_port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        Ok(Self { from, transport })
    }

    pub async fn send_otp_email(&self, to_email: &str, otp: &str) -> Result<()> {
        let html = format!(
            r#"<html>
    <body style="font-family: Arial, sans-serif; padding: 20px; background-color: #f4f4f4;">
        <div style="max-width: 600px; margin: 0 auto; background: white; padding: 30px; border-radius: 10px;">
            <h1 style="color: #667eea;">TravelBuddy</h1>
            <p style="color: #666;">AI Travel Planner for Students</p>
            <h2>Your Login Code</h2>
            <p>Use this code to complete your login:</p>
            <div style="background: #667eea; color: white; padding: 20px; text-align: center; font-size: 36px; font-weight: bold; border-radius: 8px; letter-spacing: 8px;">
                {otp}
            </div>
            <p style="color: #856404;">This code will expire in <strong>10 minutes</strong></p>
            <p style="color: #666; font-size: 14px;">
                If you didn't request this code, please ignore this email.
            </p>
        </div>
    </body>
</html>"#
        );

        self.send_html(to_email, "Your Travel Planner OTP", html).await
    }

    pub async fn send_trip_confirmation(&self, to_email: &str, trip: &TripRecord) -> Result<()> {
        let html = format!(
            r#"<html>
    <body style="font-family: Arial, sans-serif; padding: 20px; background-color: #f4f4f4;">
        <div style="max-width: 600px; margin: 0 auto; background: white; padding: 30px; border-radius: 10px;">
            <h1 style="color: #667eea;">Booking Confirmed!</h1>
            <h2>Trip to {destination}</h2>
            <p><strong>Duration:</strong> {days} days</p>
            <p><strong>Travelers:</strong> {members} person(s)</p>
            <p><strong>Total Budget:</strong> {budget}</p>
            <hr>
            <p>Your trip plan is ready! Check your dashboard for the full itinerary.</p>
            <p style="color: #666; font-size: 12px;">TravelBuddy - AI Travel Planner</p>
        </div>
    </body>
</html>"#,
            destination = trip.destination,
            days = trip.days,
            members = trip.members,
            budget = trip.budget,
        );

        let subject = format!("Trip Booking Confirmed - {}", trip.destination);
        self.send_html(to_email, &subject, html).await
    }

    async fn send_html(&self, to_email: &str, subject: &str, html: String) -> Result<()> {
        let to = to_email
            .parse::<Mailbox>()
            .map_err(|e| AppError::Mail(format!("Invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| AppError::Mail(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("SMTP send failed: {}", e)))?;

        tracing::info!("Email '{}' sent to {}", subject, to_email);
        Ok(())
    }
}
