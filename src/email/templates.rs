fn layout(heading: &str, body: &str, button_label: &str, link: &str, footer: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>{heading}</h2>
    <p>{body}</p>
    <p><a href="{link}" style="display: inline-block; padding: 10px 20px; background: #4f46e5; color: white; text-decoration: none; border-radius: 4px;">{button_label}</a></p>
    <p style="color: #666; font-size: 14px;">Or paste this link into your browser: {link}</p>
    <p style="color: #666; font-size: 14px;">{footer}</p>
</body>
</html>"#
    )
}

/// Returns `(html, text)`.
pub fn render_invite(link: &str, ttl_hours: i64) -> (String, String) {
    let body = "You've been invited to join the career portal. Follow the link below to create your account.";
    let footer = format!(
        "This link expires in {ttl_hours} hours and can only be used once. If you weren't expecting this invite, you can ignore it."
    );
    let html = layout("Welcome to the Career Portal", body, "Create Account", link, &footer);
    let text = format!("{body}\n\n{link}\n\n{footer}\n");
    (html, text)
}

/// Returns `(html, text)`.
pub fn render_password_reset(link: &str, ttl_hours: i64) -> (String, String) {
    let body = "A password reset was requested for your career portal account.";
    let footer = format!(
        "This link expires in {ttl_hours} hours and can only be used once. If you didn't request this, you can ignore it."
    );
    let html = layout("Password Reset", body, "Reset Password", link, &footer);
    let text = format!("{body}\n\n{link}\n\n{footer}\n");
    (html, text)
}
