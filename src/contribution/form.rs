//! The contribution entry form: field validation and rendering.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    contribution::{Contribution, NewContribution},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
};

/// Member names longer than this are rejected.
pub const MAX_NAME_LENGTH: usize = 100;

const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The raw values submitted with the entry form.
///
/// Every field is kept as text so the form can be shown again with exactly
/// what the user typed when validation fails.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContributionFormData {
    /// The member's name.
    #[serde(default)]
    pub name: String,
    /// The amount in whole shillings.
    #[serde(default)]
    pub amount: String,
    /// An ISO date, blank means today.
    #[serde(default)]
    pub date: String,
}

/// One message per invalid field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributionFormErrors {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
}

impl ContributionFormData {
    /// Check every field and build the contribution.
    ///
    /// A blank date is taken to mean `today`.
    ///
    /// # Errors
    /// Returns the messages for every field that failed validation, not just
    /// the first.
    pub fn validate(&self, today: Date) -> Result<NewContribution, ContributionFormErrors> {
        let name = parse_name(&self.name);
        let amount = parse_amount(&self.amount);
        let date = parse_date(&self.date, today);

        match (name, amount, date) {
            (Ok(name), Ok(amount), Ok(date)) => Ok(Contribution::build(name, amount, date)),
            (name, amount, date) => Err(ContributionFormErrors {
                name: name.err(),
                amount: amount.err(),
                date: date.err(),
            }),
        }
    }
}

fn parse_name(raw: &str) -> Result<&str, String> {
    let name = raw.trim();

    if name.is_empty() {
        Err("Name cannot be empty.".to_owned())
    } else if name.chars().count() > MAX_NAME_LENGTH {
        Err(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters long."
        ))
    } else {
        Ok(name)
    }
}

fn parse_amount(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err("Amount is required.".to_owned());
    }

    raw.parse::<i64>()
        .map_err(|_| format!("\"{raw}\" is not a whole number of shillings."))
}

fn parse_date(raw: &str, today: Date) -> Result<Date, String> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Ok(today);
    }

    Date::parse(raw, ISO_DATE).map_err(|_| format!("\"{raw}\" is not a date in YYYY-MM-DD format."))
}

/// Render the entry form.
///
/// `values` are written back into the inputs and `errors` are shown beneath
/// the field they belong to. The submit button is disabled when the ledger
/// has not been loaded yet.
pub fn contribution_form(
    values: &ContributionFormData,
    errors: &ContributionFormErrors,
    today: Date,
    is_prepared: bool,
) -> Markup {
    let date_value = if values.date.is_empty() {
        today.to_string()
    } else {
        values.date.clone()
    };

    html! {
        form
            hx-post=(endpoints::RECORD_NEW_VIEW)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Member Name" }

                input
                    name="name"
                    id="name"
                    type="text"
                    placeholder="e.g. Alice"
                    maxlength=(MAX_NAME_LENGTH)
                    required
                    autofocus
                    value=(values.name)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error("name-error", errors.name.as_deref()))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="1"
                        placeholder="10000"
                        required
                        value=(values.amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (field_error("amount-error", errors.amount.as_deref()))
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(date_value)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error("date-error", errors.date.as_deref()))
            }

            button
                type="submit"
                id="submit-button"
                disabled[!is_prepared]
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) }
                "Save Contribution"
            }
        }
    }
}

fn field_error(id: &str, message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p id=(id) class="mt-1 text-red-600 dark:text-red-400" { (message) }
        }
    }
}
