//! User-facing copy for submission results.

/// Language of the messages returned to the landing page. Romanian is the
/// site's primary language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ro,
    En,
}

impl Locale {
    /// Picks a locale from an `Accept-Language` header value.
    ///
    /// Only the primary subtag of each entry is inspected, in header order;
    /// quality weights are ignored.
    #[must_use]
    pub fn from_accept_language(header: &str) -> Self {
        for entry in header.split(',') {
            let tag = entry.split(';').next().unwrap_or_default().trim();
            let primary = tag.split('-').next().unwrap_or_default().to_ascii_lowercase();
            match primary.as_str() {
                "ro" => return Self::Ro,
                "en" => return Self::En,
                _ => {}
            }
        }
        Self::default()
    }
}

/// Messages keyed by what happened to the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NameTooShort,
    SurnameTooShort,
    EmailInvalid,
    HandleInvalid,
    CategoryInvalid,
    PayloadNotObject,
    AdminNotificationFailed,
    ConfirmationFailed,
    ContactManually,
    RecordingFailed,
    Unexpected,
}

impl Notice {
    #[must_use]
    pub const fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::NameTooShort, Locale::Ro) => "Numele trebuie să aibă cel puțin 2 caractere.",
            (Self::NameTooShort, Locale::En) => "Name must be at least 2 characters long.",
            (Self::SurnameTooShort, Locale::Ro) => "Prenumele trebuie să aibă cel puțin 2 caractere.",
            (Self::SurnameTooShort, Locale::En) => "Surname must be at least 2 characters long.",
            (Self::EmailInvalid, Locale::Ro) => "Adresa de email nu este validă.",
            (Self::EmailInvalid, Locale::En) => "The email address is not valid.",
            (Self::HandleInvalid, Locale::Ro) => "ID-ul TikTok nu este valid sau nu există.",
            (Self::HandleInvalid, Locale::En) => "The TikTok handle is invalid or does not exist.",
            (Self::CategoryInvalid, Locale::Ro) => "Tipul formularului nu este recunoscut.",
            (Self::CategoryInvalid, Locale::En) => "The form type is not recognized.",
            (Self::PayloadNotObject, Locale::Ro) => "Datele trimise nu au formatul așteptat.",
            (Self::PayloadNotObject, Locale::En) => "The submitted data is not in the expected format.",
            (Self::AdminNotificationFailed, Locale::Ro) => "Nu am putut trimite notificarea către administrator.",
            (Self::AdminNotificationFailed, Locale::En) => "We could not send the notification to the administrator.",
            (Self::ConfirmationFailed, Locale::Ro) => {
                "Nu am putut trimite email-ul de confirmare, dar înregistrarea a fost procesată."
            }
            (Self::ConfirmationFailed, Locale::En) => {
                "We could not send the confirmation email, but your registration was processed."
            }
            (Self::ContactManually, Locale::Ro) => {
                "Înregistrarea a fost procesată, dar nu am putut trimite email-urile de confirmare. Te vom contacta în curând."
            }
            (Self::ContactManually, Locale::En) => {
                "Your registration was processed, but we could not send the confirmation emails. We will contact you soon."
            }
            (Self::RecordingFailed, Locale::Ro) => "Nu am putut salva înregistrarea. Te rugăm să încerci din nou.",
            (Self::RecordingFailed, Locale::En) => "We could not save your registration. Please try again.",
            (Self::Unexpected, Locale::Ro) => "A apărut o eroare neașteptată.",
            (Self::Unexpected, Locale::En) => "An unexpected error occurred.",
        }
    }
}
