use crate::backend::mail::OutgoingMail;

pub const OTP_SUBJECT: &str = "Talks: OTP for verification";

/// Verification mail carrying a one-time password
pub fn otp_mail(to: &str, firstname: &str, otp: &str) -> OutgoingMail {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif; color: #1f2937;">
    <p>Hi {firstname},</p>
    <p>Use this code to verify your Talks account. It expires in 2 minutes.</p>
    <h2 class="otp" style="letter-spacing: 6px;">{otp}</h2>
    <p>If you did not sign up for Talks, you can ignore this email.</p>
  </body>
</html>"#,
        firstname = firstname,
        otp = otp,
    );

    OutgoingMail {
        to: to.to_string(),
        subject: OTP_SUBJECT.to_string(),
        html,
    }
}
