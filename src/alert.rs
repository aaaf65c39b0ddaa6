//! Alert boxes for telling users why a request failed.
//!
//! Alerts are rendered into the `#alert-container` element of the base page
//! with an out-of-band swap, so any HTMX form can target them on error.

use maud::{Markup, html};

/// A message to show to the user in a dismissable box.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The operation failed.
    Error {
        /// The headline.
        message: String,
        /// What went wrong and how to fix it, may be empty.
        details: String,
    },
}

const ERROR_STYLE: &str = "flex items-start gap-3 p-4 rounded-lg shadow-lg \
    text-red-800 bg-red-50 border border-red-300 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

impl Alert {
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(style) role="alert"
                {
                    div class="flex-1"
                    {
                        p class="text-sm font-medium" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1 text-sm opacity-80" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="text-sm font-semibold opacity-70 hover:opacity-100"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "✕"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_renders_message_and_details() {
        let alert = Alert::Error {
            message: "No file uploaded.".to_owned(),
            details: "Pick a file".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().into_string());

        let message = html
            .select(&Selector::parse("#alert-container p.text-sm.font-medium").unwrap())
            .next()
            .expect("No alert message found")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), "No file uploaded.");

        let details = html
            .select(&Selector::parse("#alert-container p.mt-1.text-sm.opacity-80").unwrap())
            .next()
            .expect("No alert details found")
            .text()
            .collect::<String>();
        assert_eq!(details.trim(), "Pick a file");
    }

    #[test]
    fn omits_empty_details() {
        let alert = Alert::Error {
            message: "Something went wrong".to_owned(),
            details: String::new(),
        };

        let html = Html::parse_fragment(&alert.into_html().into_string());

        assert!(
            html.select(&Selector::parse("p.opacity-80").unwrap())
                .next()
                .is_none()
        );
    }
}
