//! Server-side HTML for the fraud check page

use crate::config::VoiceConfig;
use crate::types::verdict::{CheckOutcome, Verdict};
use crate::web::form::CheckForm;
use axum::http::StatusCode;
use std::fmt::Write;

pub const WELCOME_NARRATION: &str = "Welcome to Standard Bank Fraud Detection System. \
    Please enter your credit card information and verify the transaction details.";
pub const FRAUD_NARRATION: &str = "Warning! Fraudulent transaction detected. \
    This transaction has been flagged as potentially fraudulent. \
    Please review the details and contact customer support if necessary.";
pub const LEGITIMATE_NARRATION: &str =
    "Transaction approved! This transaction appears to be legitimate and can proceed normally.";
pub const MISSING_FIELDS_NARRATION: &str = "Please fill in all required fields including \
    merchant name, category, and credit card number.";
pub const TEST_NARRATION: &str =
    "Voice system is working correctly. You can now use the fraud detection system.";

pub const MISSING_FIELDS_MESSAGE: &str =
    "⚠️ Please fill in all required fields (Merchant Name, Category, and Credit Card Number)";

const STYLE: &str = r#"
:root {
  --sb-primary: #003DA5; --sb-secondary: #0052CC; --sb-dark: #002B7A;
  --sb-success: #28A745; --sb-danger: #DC3545;
}
body { margin: 0; font-family: system-ui, sans-serif; background: linear-gradient(135deg, #f8f9fa 0%, #e9ecef 100%); }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 260px; padding: 1.5rem; color: white; background: linear-gradient(180deg, var(--sb-primary) 0%, var(--sb-secondary) 100%); }
.sidebar button { background: white; color: var(--sb-primary); border: none; border-radius: 20px; padding: 8px 20px; cursor: pointer; }
.main { flex: 1; padding: 2rem; max-width: 1100px; }
.main-header { background: linear-gradient(90deg, var(--sb-primary) 0%, var(--sb-secondary) 100%); padding: 2rem; border-radius: 15px; margin-bottom: 2rem; box-shadow: 0 8px 32px rgba(0, 61, 165, 0.15); }
.main-header h1 { color: white; font-size: 2.5rem; text-align: center; margin: 0; }
.main-header p { color: rgba(255,255,255,0.9); text-align: center; margin: 0.5rem 0 0 0; }
.form-container, .result-container { background: white; padding: 2rem; border-radius: 15px; box-shadow: 0 4px 20px rgba(0,0,0,0.1); margin-bottom: 2rem; }
.columns { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 1.5rem; }
label { display: block; font-weight: 600; color: var(--sb-dark); margin: 0.8rem 0 0.3rem; }
input[type=text], input[type=number], select { width: 100%; box-sizing: border-box; border: 2px solid #e9ecef; border-radius: 10px; padding: 12px 16px; font-size: 16px; }
input:focus, select:focus { border-color: var(--sb-primary); outline: none; }
input[type=range] { width: 100%; accent-color: var(--sb-primary); }
.submit { background: linear-gradient(90deg, var(--sb-primary) 0%, var(--sb-secondary) 100%); color: white; border: none; border-radius: 25px; padding: 15px 40px; font-size: 18px; font-weight: 600; cursor: pointer; width: 100%; margin-top: 1rem; }
.info, .error { border-radius: 10px; padding: 1rem; margin-top: 1rem; }
.info { background: #E6F0FF; color: var(--sb-dark); }
.error { background: #fde8ea; color: var(--sb-danger); }
.result-fraud, .result-legitimate { color: white; padding: 1.5rem; border-radius: 15px; text-align: center; }
.result-fraud { background: linear-gradient(135deg, #ff6b6b 0%, #ee5a52 100%); }
.result-legitimate { background: linear-gradient(135deg, #51cf66 0%, #40c057 100%); }
.summary { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; text-align: center; }
.metric strong { display: block; font-size: 1.6rem; }
footer { text-align: center; color: #666; padding: 1rem; }
@media (max-width: 768px) { .layout { flex-direction: column; } .sidebar { width: auto; } .main-header h1 { font-size: 2rem; } }
"#;

/// What the page reports below the form
pub enum Notice<'a> {
    /// First visit, nothing submitted
    Welcome,
    /// A scored submission
    Outcome(&'a CheckOutcome),
    /// A rejected submission and the reason shown to the user
    Invalid { message: &'a str, missing_fields: bool },
}

/// Everything needed to render the fraud check page
pub struct PageView<'a> {
    pub form: &'a CheckForm,
    /// Customer to merchant distance, when all coordinates are usable
    pub distance_km: Option<f64>,
    pub voice: &'a VoiceConfig,
    pub notice: Notice<'a>,
}

/// Render the full page
pub fn page(view: &PageView<'_>) -> String {
    let mut body = String::new();
    body.push_str(
        r#"<div class="main-header"><h1>💳 Credit Card Fraud Detection System</h1>
<p>Advanced AI-powered fraud detection using machine learning and geospatial analysis</p></div>"#,
    );
    body.push_str(&form(view.form, view.distance_km));

    let narration = match &view.notice {
        Notice::Welcome => Some(WELCOME_NARRATION),
        Notice::Outcome(outcome) => {
            body.push_str(&outcome_panel(outcome));
            Some(if outcome.verdict.is_fraud() {
                FRAUD_NARRATION
            } else {
                LEGITIMATE_NARRATION
            })
        }
        Notice::Invalid {
            message,
            missing_fields,
        } => {
            let _ = write!(body, r#"<div class="error">{}</div>"#, escape(message));
            missing_fields.then_some(MISSING_FIELDS_NARRATION)
        }
    };

    let script = if view.form.voice_enabled() {
        narration.map(speak_script).unwrap_or_default()
    } else {
        String::new()
    };

    document(
        "Credit Card Fraud Detection",
        &sidebar(view.form.voice_enabled()),
        &body,
        &format!("{}{}", voice_helpers(view.voice), script),
    )
}

/// Minimal page for failures outside the form flow
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<div class="result-container"><h2>{} {}</h2><div class="error">{}</div><p><a href="/">Back to the form</a></p></div>"#,
        status.as_u16(),
        escape(status.canonical_reason().unwrap_or("Error")),
        escape(message)
    );
    document("Fraud Check Error", "", &body, "")
}

fn document(title: &str, sidebar: &str, body: &str, scripts: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>💳 {title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="layout">
{sidebar}
<main class="main">
{body}
<hr>
<footer><p>🔒 Powered by Advanced Machine Learning | Built with ❤️ for secure transactions</p>
<p>💳 Standard Bank Fraud Detection System</p></footer>
</main>
</div>
{scripts}
</body>
</html>"#,
        title = escape(title),
    )
}

fn sidebar(voice_enabled: bool) -> String {
    let mut html = String::from(r#"<aside class="sidebar"><h3>🔊 Voice Controls</h3>"#);
    if voice_enabled {
        html.push_str(
            r#"<p><strong>Voice Features:</strong></p>
<ul><li>Welcome message on page load</li><li>Fraud detection results</li><li>Transaction status updates</li></ul>
<button type="button" onclick="testVoice()">🎤 Test Voice</button>
<p><strong>🔧 Voice Setup Instructions:</strong></p>
<ol><li>Make sure your browser allows audio</li><li>Check that your speakers/headphones are on</li>
<li>Try refreshing the page if voice doesn't work</li><li>Some browsers may require user interaction first</li></ol>"#,
        );
    } else {
        html.push_str("<p>Voice guidance is off. Tick the checkbox in the form to enable it.</p>");
    }
    html.push_str("</aside>");
    html
}

fn form(form: &CheckForm, distance_km: Option<f64>) -> String {
    let mut html = String::from(r#"<form class="form-container" method="post" action="/check">"#);
    html.push_str(r#"<div class="columns"><div><h3>📋 Transaction Details</h3>"#);
    html.push_str(&text_input("merchant", "🏪 Merchant Name", &form.merchant, "Enter merchant name"));
    html.push_str(&text_input("category", "🏷️ Category", &form.category, "e.g., grocery, electronics"));
    html.push_str(&number_input("amount", "💰 Transaction Amount ($)", form.amount, "0.01", Some(0.0)));
    html.push_str(&text_input("cc_num", "💳 Credit Card Number", &form.cc_num, "Enter card number"));
    html.push_str(r#"</div><div><h3>🗺️ Location Information</h3>"#);
    html.push_str(&number_input("lat", "🌍 Customer Latitude", form.lat, "0.000001", None));
    html.push_str(&number_input("long", "🌍 Customer Longitude", form.long, "0.000001", None));
    html.push_str(&number_input("merch_lat", "🏢 Merchant Latitude", form.merch_lat, "0.000001", None));
    html.push_str(&number_input("merch_long", "🏢 Merchant Longitude", form.merch_long, "0.000001", None));
    html.push_str("</div></div>");

    html.push_str(r#"<h3>⏰ Transaction Timing</h3><div class="columns">"#);
    html.push_str(&slider("hour", "🕐 Transaction Hour", form.hour, 0, 23));
    html.push_str(&slider("day", "📅 Transaction Day", form.day, 1, 31));
    html.push_str(&slider("month", "📆 Transaction Month", form.month, 1, 12));
    html.push_str("</div>");

    html.push_str(r#"<h3>👤 Customer Information</h3><label for="gender">👤 Gender</label><select id="gender" name="gender">"#);
    for gender in ["Male", "Female"] {
        let selected = if form.gender.label() == gender { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{gender}"{selected}>{gender}</option>"#);
    }
    html.push_str("</select>");

    let checked = if form.voice_enabled() { " checked" } else { "" };
    let _ = write!(
        html,
        r#"<label><input type="checkbox" name="voice" value="on"{checked}> Enable Voice Guidance</label>"#
    );

    let distance = distance_km
        .map(|km| format!("{km:.2} km"))
        .unwrap_or_else(|| "enter all four coordinates".to_string());
    let _ = write!(
        html,
        r#"<div class="info">📍 <strong>Distance between customer and merchant:</strong> {distance}</div>
<button class="submit" type="submit">🔍 Check For Fraud</button></form>"#
    );
    html
}

fn text_input(name: &str, label: &str, value: &str, placeholder: &str) -> String {
    format!(
        r#"<label for="{name}">{label}</label><input type="text" id="{name}" name="{name}" value="{}" placeholder="{}">"#,
        escape(value),
        escape(placeholder)
    )
}

fn number_input(name: &str, label: &str, value: Option<f64>, step: &str, min: Option<f64>) -> String {
    let min = min.map(|m| format!(r#" min="{m}""#)).unwrap_or_default();
    let value = value.map(|v| v.to_string()).unwrap_or_default();
    format!(
        r#"<label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" value="{value}" step="{step}"{min} required>"#
    )
}

fn slider(name: &str, label: &str, value: Option<u32>, min: u32, max: u32) -> String {
    let value = value.unwrap_or(min);
    format!(
        r#"<div><label for="{name}">{label}: <output id="{name}_out">{value}</output></label>
<input type="range" id="{name}" name="{name}" min="{min}" max="{max}" value="{value}" oninput="document.getElementById('{name}_out').value = this.value"></div>"#
    )
}

fn outcome_panel(outcome: &CheckOutcome) -> String {
    let class = match outcome.verdict {
        Verdict::Fraudulent => "result-fraud",
        Verdict::Legitimate => "result-legitimate",
    };
    format!(
        r#"<div class="result-container"><div class="{class}"><h2>{}</h2><p>{}</p></div></div>
<h3>📊 Transaction Summary</h3>
<div class="summary">
<div class="metric">💰 Amount<strong>{}</strong></div>
<div class="metric">📍 Distance<strong>{:.2} km</strong></div>
<div class="metric">🕐 Time<strong>{:02}:00</strong></div>
</div>"#,
        outcome.verdict.headline(),
        outcome.verdict.message(),
        format_amount(outcome.amount),
        outcome.distance_km,
        outcome.hour,
    )
}

/// Browser speech helpers shared by every narration
fn voice_helpers(voice: &VoiceConfig) -> String {
    format!(
        r#"<script>
function speakText(text) {{
  if (!('speechSynthesis' in window)) {{ console.log('Speech synthesis not supported'); return; }}
  if (speechSynthesis.speaking) {{ speechSynthesis.cancel(); }}
  const utterance = new SpeechSynthesisUtterance(text);
  utterance.rate = {rate};
  utterance.pitch = 1.0;
  utterance.volume = {volume};
  const preferred = speechSynthesis.getVoices().find(v =>
    v.name.includes('Microsoft') || v.name.includes('Hannah') || v.name.includes('Zira'));
  if (preferred) {{ utterance.voice = preferred; }}
  speechSynthesis.speak(utterance);
}}
function testVoice() {{ speakText({test}); }}
</script>"#,
        rate = voice.rate,
        volume = voice.volume,
        test = js_string(TEST_NARRATION),
    )
}

fn speak_script(text: &str) -> String {
    format!(
        "<script>window.addEventListener('load', () => setTimeout(() => speakText({}), 500));</script>",
        js_string(text)
    )
}

/// Quote text as a JavaScript string literal safe to embed in a script tag
fn js_string(text: &str) -> String {
    serde_json::to_string(text)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// Format a dollar amount with thousands separators, e.g. `$1,234.56`
pub fn format_amount(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_extractor::FeatureVector;

    fn outcome(verdict: Verdict) -> CheckOutcome {
        CheckOutcome::new(
            verdict,
            FeatureVector {
                merchant_code: -1,
                category_code: -1,
                amount: 1234.5,
                distance_km: 5.4201,
                hour: 7,
                day: 15,
                month: 6,
                gender_code: -1,
                card_bucket: 42,
            },
        )
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(100.0), "$100.00");
        assert_eq!(format_amount(1234.5), "$1,234.50");
        assert_eq!(format_amount(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_amount(0.0), "$0.00");
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn test_js_string_cannot_close_script() {
        assert_eq!(js_string("a</script>b"), r#""a<\/script>b""#);
    }

    #[test]
    fn test_welcome_page() {
        let form = CheckForm::with_voice(true);
        let html = page(&PageView {
            form: &form,
            distance_km: Some(5.42),
            voice: &VoiceConfig::default(),
            notice: Notice::Welcome,
        });

        assert!(html.contains("Credit Card Fraud Detection System"));
        assert!(html.contains("5.42 km"));
        assert!(html.contains(r#"name="lat" value="40.7128""#));
        assert!(html.contains("Welcome to Standard Bank Fraud Detection System"));
    }

    #[test]
    fn test_fraud_outcome_page() {
        let form = CheckForm::with_voice(true);
        let outcome = outcome(Verdict::Fraudulent);
        let html = page(&PageView {
            form: &form,
            distance_km: Some(outcome.distance_km),
            voice: &VoiceConfig::default(),
            notice: Notice::Outcome(&outcome),
        });

        assert!(html.contains("result-fraud"));
        assert!(html.contains("FRAUDULENT TRANSACTION DETECTED"));
        assert!(html.contains("$1,234.50"));
        assert!(html.contains("07:00"));
        assert!(html.contains("Warning! Fraudulent transaction detected."));
    }

    #[test]
    fn test_voice_disabled_has_no_narration() {
        let form = CheckForm::default();
        let outcome = outcome(Verdict::Legitimate);
        let html = page(&PageView {
            form: &form,
            distance_km: Some(outcome.distance_km),
            voice: &VoiceConfig::default(),
            notice: Notice::Outcome(&outcome),
        });

        assert!(html.contains("result-legitimate"));
        assert!(!html.contains("speakText(\"Transaction approved!"));
        assert!(html.contains("Voice guidance is off"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let form = CheckForm {
            merchant: "<b>Shop</b>".to_string(),
            ..CheckForm::default()
        };
        let html = page(&PageView {
            form: &form,
            distance_km: None,
            voice: &VoiceConfig::default(),
            notice: Notice::Welcome,
        });

        assert!(html.contains("&lt;b&gt;Shop&lt;/b&gt;"));
        assert!(!html.contains("<b>Shop</b>"));
    }

    #[test]
    fn test_blank_numbers_render_empty() {
        let form = CheckForm {
            amount: None,
            lat: None,
            ..CheckForm::default()
        };
        let html = page(&PageView {
            form: &form,
            distance_km: form.distance_km(),
            voice: &VoiceConfig::default(),
            notice: Notice::Welcome,
        });

        assert!(html.contains(r#"name="amount" value="" step="0.01" min="0" required>"#));
        assert!(html.contains(r#"name="long" value="-74.006" step="0.000001" required>"#));
        assert!(html.contains("enter all four coordinates"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(html.contains("500 Internal Server Error"));
        assert!(html.contains("boom"));
    }
}
