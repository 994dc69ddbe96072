//! The trip form: field focus, text editing, enum cycling, and validation.
//!
//! Kept free of any rendering so validation and request building are
//! testable on their own.

use crate::config::TripDefaults;
use crate::model::{BudgetLevel, Priority, TravelRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    DestinationCity,
    DestinationCountry,
    DepartDate,
    ReturnDate,
    Priority,
    BudgetLevel,
    DepartureAirport,
    DestinationAirport,
    Preferences,
}

impl FormField {
    pub const ORDER: [FormField; 9] = [
        FormField::DestinationCity,
        FormField::DestinationCountry,
        FormField::DepartDate,
        FormField::ReturnDate,
        FormField::Priority,
        FormField::BudgetLevel,
        FormField::DepartureAirport,
        FormField::DestinationAirport,
        FormField::Preferences,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::DestinationCity => "Destination city",
            FormField::DestinationCountry => "Country",
            FormField::DepartDate => "Depart date",
            FormField::ReturnDate => "Return date",
            FormField::Priority => "Priority",
            FormField::BudgetLevel => "Budget",
            FormField::DepartureAirport => "From airport",
            FormField::DestinationAirport => "To airport (optional)",
            FormField::Preferences => "Preferences (optional)",
        }
    }

    /// Enum fields cycle with ←/→ instead of accepting typed input.
    pub fn is_choice(self) -> bool {
        matches!(self, FormField::Priority | FormField::BudgetLevel)
    }
}

#[derive(Debug)]
pub struct TripForm {
    pub destination_city: String,
    pub destination_country: String,
    pub depart_date: String,
    pub return_date: String,
    pub priority: Priority,
    pub budget_level: BudgetLevel,
    pub departure_airport: String,
    pub destination_airport: String,
    pub additional_preferences: String,
    pub focus: usize,
    /// Inline validation error from the last submit attempt.
    pub error: Option<String>,
}

impl TripForm {
    pub fn from_defaults(defaults: &TripDefaults) -> Self {
        Self {
            destination_city: defaults.destination_city.clone(),
            destination_country: defaults.destination_country.clone(),
            depart_date: defaults.depart_date_or_default(),
            return_date: defaults.return_date_or_default(),
            priority: defaults.priority,
            budget_level: defaults.budget_level,
            departure_airport: defaults.departure_airport.clone(),
            destination_airport: defaults.destination_airport.clone().unwrap_or_default(),
            additional_preferences: defaults
                .additional_preferences
                .clone()
                .unwrap_or_default(),
            focus: 0,
            error: None,
        }
    }

    pub fn focused(&self) -> FormField {
        FormField::ORDER[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FormField::ORDER.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self
            .focus
            .checked_sub(1)
            .unwrap_or(FormField::ORDER.len() - 1);
    }

    pub fn push_char(&mut self, ch: char) {
        let field = self.focused();
        if field.is_choice() {
            return;
        }
        self.error = None;
        self.value_mut(field).push(ch);
    }

    pub fn pop_char(&mut self) {
        let field = self.focused();
        if field.is_choice() {
            return;
        }
        self.value_mut(field).pop();
    }

    pub fn clear_focused(&mut self) {
        let field = self.focused();
        if !field.is_choice() {
            self.value_mut(field).clear();
        }
    }

    pub fn cycle(&mut self, forward: bool) {
        match self.focused() {
            FormField::Priority => {
                self.priority = cycle_in(&Priority::ALL, self.priority, forward);
            }
            FormField::BudgetLevel => {
                self.budget_level = cycle_in(&BudgetLevel::ALL, self.budget_level, forward);
            }
            _ => {}
        }
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::DestinationCity => self.destination_city.clone(),
            FormField::DestinationCountry => self.destination_country.clone(),
            FormField::DepartDate => self.depart_date.clone(),
            FormField::ReturnDate => self.return_date.clone(),
            FormField::Priority => self.priority.label().to_string(),
            FormField::BudgetLevel => self.budget_level.label().to_string(),
            FormField::DepartureAirport => self.departure_airport.clone(),
            FormField::DestinationAirport => self.destination_airport.clone(),
            FormField::Preferences => self.additional_preferences.clone(),
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::DestinationCity => &mut self.destination_city,
            FormField::DestinationCountry => &mut self.destination_country,
            FormField::DepartDate => &mut self.depart_date,
            FormField::ReturnDate => &mut self.return_date,
            FormField::DepartureAirport => &mut self.departure_airport,
            FormField::DestinationAirport => &mut self.destination_airport,
            FormField::Preferences => &mut self.additional_preferences,
            FormField::Priority | FormField::BudgetLevel => {
                unreachable!("choice fields have no text buffer")
            }
        }
    }

    /// Validate and build the request. Date ordering is left to the planner;
    /// only presence and ISO format are checked here.
    pub fn build_request(&self) -> Result<TravelRequest, String> {
        let destination_city = self.destination_city.trim();
        if destination_city.is_empty() {
            return Err("Destination city is required".to_string());
        }
        let destination_country = self.destination_country.trim();
        if destination_country.is_empty() {
            return Err("Country is required".to_string());
        }
        validate_date("Depart date", &self.depart_date)?;
        validate_date("Return date", &self.return_date)?;
        let departure_airport = self.departure_airport.trim();
        if departure_airport.is_empty() {
            return Err("Departure airport is required".to_string());
        }

        let destination_airport = self.destination_airport.trim();
        let preferences = self.additional_preferences.trim();
        Ok(TravelRequest {
            destination_city: destination_city.to_string(),
            destination_country: destination_country.to_string(),
            depart_date: self.depart_date.trim().to_string(),
            return_date: self.return_date.trim().to_string(),
            priority: self.priority,
            budget_level: self.budget_level,
            departure_airport: departure_airport.to_string(),
            destination_airport: (!destination_airport.is_empty())
                .then(|| destination_airport.to_string()),
            additional_preferences: (!preferences.is_empty())
                .then(|| preferences.to_string()),
        })
    }
}

fn cycle_in<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        idx.checked_sub(1).unwrap_or(all.len() - 1)
    };
    all[next]
}

fn validate_date(label: &str, value: &str) -> Result<(), String> {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("{label} must be a YYYY-MM-DD date"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> TripForm {
        let mut form = TripForm::from_defaults(&TripDefaults::default());
        form.depart_date = "2026-10-10".to_string();
        form.return_date = "2026-10-17".to_string();
        form
    }

    #[test]
    fn defaults_build_a_valid_request() {
        let req = filled_form().build_request().unwrap();
        assert_eq!(req.destination_city, "Tokyo");
        assert_eq!(req.departure_airport, "LHR");
        assert!(req.destination_airport.is_none());
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut form = filled_form();
        form.destination_city = "  ".to_string();
        assert!(form.build_request().unwrap_err().contains("city"));

        let mut form = filled_form();
        form.departure_airport.clear();
        assert!(form.build_request().unwrap_err().contains("airport"));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let mut form = filled_form();
        form.depart_date = "10/10/2026".to_string();
        assert!(form.build_request().unwrap_err().contains("YYYY-MM-DD"));
    }

    #[test]
    fn return_before_depart_is_not_checked_here() {
        let mut form = filled_form();
        form.return_date = "2026-10-01".to_string();
        assert!(form.build_request().is_ok());
    }

    #[test]
    fn optional_fields_become_none_when_blank() {
        let mut form = filled_form();
        form.destination_airport = " ".to_string();
        form.additional_preferences = String::new();
        let req = form.build_request().unwrap();
        assert!(req.destination_airport.is_none());
        assert!(req.additional_preferences.is_none());

        form.destination_airport = "HND".to_string();
        let req = form.build_request().unwrap();
        assert_eq!(req.destination_airport.as_deref(), Some("HND"));
    }

    #[test]
    fn focus_wraps_both_directions() {
        let mut form = filled_form();
        assert_eq!(form.focused(), FormField::DestinationCity);
        form.focus_prev();
        assert_eq!(form.focused(), FormField::Preferences);
        form.focus_next();
        assert_eq!(form.focused(), FormField::DestinationCity);
    }

    #[test]
    fn choice_fields_cycle_and_ignore_typing() {
        let mut form = filled_form();
        form.focus = FormField::ORDER
            .iter()
            .position(|f| *f == FormField::Priority)
            .unwrap();
        assert_eq!(form.priority, Priority::Food);
        form.cycle(true);
        assert_eq!(form.priority, Priority::Culture);
        form.cycle(false);
        form.cycle(false);
        assert_eq!(form.priority, Priority::Relaxation);

        form.push_char('x');
        assert_eq!(form.value(FormField::Priority), "relaxation");
    }
}
