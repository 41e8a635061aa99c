//! Email copy for the operator notification and the submitter confirmation.

use crate::domain::email::EmailMessage;
use crate::domain::submission::{FormCategory, SubmissionRequest};
use time::OffsetDateTime;
use time::macros::format_description;

const SUPPORT_ADDRESS: &str = "support@starcast.com";
const SITE_URL: &str = "https://starcast.com";

const MONTHS_RO: [&str; 12] = [
    "ianuarie",
    "februarie",
    "martie",
    "aprilie",
    "mai",
    "iunie",
    "iulie",
    "august",
    "septembrie",
    "octombrie",
    "noiembrie",
    "decembrie",
];

/// Escapes the characters that matter inside HTML text and attribute values.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// "19 octombrie 2026"
#[must_use]
pub fn long_date_ro(at: OffsetDateTime) -> String {
    let month = MONTHS_RO[usize::from(u8::from(at.month())) - 1];
    format!("{} {} {}", at.day(), month, at.year())
}

fn timestamp(at: OffsetDateTime) -> String {
    at.format(format_description!("[day].[month].[year], [hour]:[minute]:[second] UTC"))
        .unwrap_or_else(|_| at.to_string())
}

const fn category_label(category: FormCategory) -> &'static str {
    match category {
        FormCategory::Signup => "Înscriere",
        FormCategory::Consultation => "Consultație",
    }
}

#[must_use]
pub const fn operator_subject(category: FormCategory) -> &'static str {
    match category {
        FormCategory::Signup => "Nouă Înscriere StarCast",
        FormCategory::Consultation => "Nouă Solicitare de Consultație StarCast",
    }
}

#[must_use]
pub const fn confirmation_subject(category: FormCategory) -> &'static str {
    match category {
        FormCategory::Signup => "Confirmare Înscriere StarCast",
        FormCategory::Consultation => "Confirmare Solicitare Consultație StarCast",
    }
}

/// Message for the business owner announcing a new submission.
#[must_use]
pub fn operator_notification(req: &SubmissionRequest, operator: &str, at: OffsetDateTime) -> EmailMessage {
    let subject = operator_subject(req.category);
    let label = category_label(req.category);
    let when = timestamp(at);

    let text = format!(
        "{subject}:\n\n\
         Nume: {name}\n\
         Prenume: {surname}\n\
         Email: {email}\n\
         ID TikTok: {handle}\n\
         Tip Formular: {label}\n\n\
         Data: {when}\n",
        name = req.name,
        surname = req.surname,
        email = req.email,
        handle = req.handle,
    );

    let html = format!(
        "<h2>{subject}</h2>\n\
         <p><strong>Nume:</strong> {name}</p>\n\
         <p><strong>Prenume:</strong> {surname}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <p><strong>ID TikTok:</strong> {handle}</p>\n\
         <p><strong>Tip Formular:</strong> {label}</p>\n\
         <p><em>Data: {when}</em></p>\n",
        name = escape_html(&req.name),
        surname = escape_html(&req.surname),
        email = escape_html(&req.email),
        handle = escape_html(&req.handle),
    );

    EmailMessage { to: operator.to_owned(), subject: subject.to_owned(), text, html, from: None }
}

struct ConfirmationCopy {
    intro: &'static str,
    noun: &'static str,
    kind: &'static str,
    next_steps: [&'static str; 3],
}

const fn confirmation_copy(category: FormCategory) -> ConfirmationCopy {
    const EXPLORE: &str = "Între timp, poți explora site-ul nostru pentru a afla mai multe despre serviciile și beneficiile StarCast.";
    match category {
        FormCategory::Signup => ConfirmationCopy {
            intro: "Îți mulțumim pentru înscrierea la StarCast! Am primit cu succes datele tale și suntem încântați să te avem în comunitatea noastră de creatori TikTok Live.",
            noun: "înscrierii",
            kind: "înscriere",
            next_steps: [
                "Un manager de talente te va contacta în următoarele 48 de ore pentru a discuta despre următorii pași.",
                "Pregătește-te să ne spui mai multe despre conținutul tău și obiectivele tale pe TikTok Live.",
                EXPLORE,
            ],
        },
        FormCategory::Consultation => ConfirmationCopy {
            intro: "Îți mulțumim pentru solicitarea de consultație cu un manager de talente StarCast! Am primit cu succes solicitarea ta și suntem nerăbdători să discutăm despre oportunitățile tale pe TikTok Live.",
            noun: "solicitării",
            kind: "consultație",
            next_steps: [
                "Un manager de talente te va contacta în următoarele 24 de ore pentru a programa o discuție.",
                "Pregătește-te să discuți despre experiența ta actuală și obiectivele tale pe TikTok Live.",
                EXPLORE,
            ],
        },
    }
}

/// Receipt sent back to the person who filled in the form.
#[must_use]
pub fn confirmation(req: &SubmissionRequest, at: OffsetDateTime) -> EmailMessage {
    let subject = confirmation_subject(req.category);
    let copy = confirmation_copy(req.category);
    let date = long_date_ro(at);
    let [step1, step2, step3] = copy.next_steps;

    let text = format!(
        "Salut {name},\n\n\
         {intro}\n\n\
         Detaliile {noun} tale:\n\n\
         Nume: {name} {surname}\n\
         ID TikTok: {handle}\n\
         Data: {date}\n\n\
         Ce urmează?\n\n\
         1. {step1}\n\
         2. {step2}\n\
         3. {step3}\n\n\
         Dacă ai întrebări între timp, nu ezita să ne contactezi la {SUPPORT_ADDRESS}.\n\n\
         Cu stimă,\n\
         Echipa StarCast\n",
        name = req.name,
        surname = req.surname,
        handle = req.handle,
        intro = copy.intro,
        noun = copy.noun,
    );

    let name = escape_html(&req.name);
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width" />
  <title>{subject}</title>
  <style>
    body {{ font-family: Arial, sans-serif; background-color: #f9f9f9; margin: 0; padding: 0; }}
    .container {{ max-width: 600px; margin: auto; background: #fff; padding: 20px; border-radius: 8px; }}
    .header {{ text-align: center; }}
    .logo {{ font-size: 24px; color: #ff3366; font-weight: bold; }}
    .details {{ background: #f5f5f5; padding: 10px; border-radius: 5px; }}
    .button {{ background: linear-gradient(to right, #3b82f6, #ec4899); color: #fff; padding: 10px 20px; text-decoration: none; border-radius: 5px; display: inline-block; margin: 20px 0; }}
    .footer {{ font-size: 12px; color: #777; text-align: center; margin-top: 20px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <div class="logo">⭐ StarCast</div>
      <p>Transformăm talente în vedete TikTok Live</p>
    </div>
    <h2>Salut {name},</h2>
    <p>{intro}</p>
    <div class="details">
      <p><strong>Nume:</strong> {name} {surname}</p>
      <p><strong>ID TikTok:</strong> {handle}</p>
      <p><strong>Data:</strong> {date}</p>
    </div>
    <h3>Ce urmează?</h3>
    <ol>
      <li>{step1}</li>
      <li>{step2}</li>
      <li>{step3}</li>
    </ol>
    <div style="text-align:center;">
      <a href="{SITE_URL}" class="button">Vizitează Site-ul Nostru</a>
    </div>
    <p>Dacă ai întrebări între timp, scrie-ne la <a href="mailto:{SUPPORT_ADDRESS}">{SUPPORT_ADDRESS}</a>.</p>
    <div class="footer">
      <p>Cu stimă,<br/>Echipa StarCast</p>
      <p>&copy; {year} StarCast</p>
      <p>Email trimis către {email} pentru {kind}.</p>
    </div>
  </div>
</body>
</html>
"#,
        intro = copy.intro,
        surname = escape_html(&req.surname),
        handle = escape_html(&req.handle),
        email = escape_html(&req.email),
        year = at.year(),
        kind = copy.kind,
    );

    EmailMessage { to: req.email.clone(), subject: subject.to_owned(), text, html, from: None }
}
