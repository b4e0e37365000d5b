use crate::analyzer::validator::is_valid;
use crate::model::{CustomerResponse, ResponseField, SurveyError};

/// An editable set of survey responses. Always holds at least one row;
/// rows that fail validation stay editable and are only skipped by analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Survey {
    pub name: String,
    responses: Vec<CustomerResponse>,
}

impl Survey {
    pub fn new(name: impl Into<String>) -> Self {
        let mut survey = Self {
            name: name.into(),
            responses: Vec::new(),
        };
        survey.add_response();
        survey
    }

    /// Wraps an existing list. An empty list gets one blank row.
    pub fn with_responses(name: impl Into<String>, responses: Vec<CustomerResponse>) -> Self {
        let mut survey = Self {
            name: name.into(),
            responses,
        };
        if survey.responses.is_empty() {
            survey.add_response();
        }
        survey
    }

    pub fn responses(&self) -> &[CustomerResponse] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.responses.iter().filter(|r| is_valid(r)).count()
    }

    /// Appends a zero-valued row and returns its id.
    pub fn add_response(&mut self) -> String {
        let id = self.fresh_id();
        self.responses.push(CustomerResponse::blank(id.clone()));
        id
    }

    pub fn update_response(&mut self, id: &str, field: ResponseField, value: f64) -> Result<(), SurveyError> {
        let response = self
            .responses
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| SurveyError::UnknownResponse(id.to_string()))?;

        match field {
            ResponseField::TooCheap => response.too_cheap = value,
            ResponseField::Bargain => response.bargain = value,
            ResponseField::Expensive => response.expensive = value,
            ResponseField::TooExpensive => response.too_expensive = value,
        }
        Ok(())
    }

    pub fn remove_response(&mut self, id: &str) -> Result<CustomerResponse, SurveyError> {
        let index = self
            .responses
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| SurveyError::UnknownResponse(id.to_string()))?;

        if self.responses.len() == 1 {
            return Err(SurveyError::LastResponse);
        }
        Ok(self.responses.remove(index))
    }

    /// Swaps in a whole new response list, e.g. after an import.
    pub fn replace_responses(&mut self, responses: Vec<CustomerResponse>) -> Result<(), SurveyError> {
        if responses.is_empty() {
            return Err(SurveyError::LastResponse);
        }
        self.responses = responses;
        Ok(())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = format!("{:08x}", rand::random::<u32>());
            if !self.responses.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_survey_has_one_blank_row() {
        let survey = Survey::new("pilot");
        assert_eq!(survey.len(), 1);
        assert_eq!(survey.responses()[0].prices(), [0.0; 4]);
        assert_eq!(survey.valid_count(), 0);
    }

    #[test]
    fn added_rows_get_unique_ids() {
        let mut survey = Survey::new("pilot");
        let ids: Vec<String> = (0..50).map(|_| survey.add_response()).collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(survey.len(), 51);
    }

    #[test]
    fn update_edits_one_field_in_place() {
        let mut survey = Survey::new("pilot");
        let id = survey.responses()[0].id.clone();
        survey.update_response(&id, ResponseField::TooCheap, 5.0).unwrap();
        survey.update_response(&id, ResponseField::Bargain, 10.0).unwrap();
        survey.update_response(&id, ResponseField::Expensive, 20.0).unwrap();
        survey.update_response(&id, ResponseField::TooExpensive, 30.0).unwrap();
        assert_eq!(survey.responses()[0].prices(), [5.0, 10.0, 20.0, 30.0]);
        assert_eq!(survey.responses()[0].id, id);
        assert_eq!(survey.valid_count(), 1);
    }

    #[test]
    fn update_unknown_id_fails() {
        let mut survey = Survey::new("pilot");
        let err = survey.update_response("nope", ResponseField::Bargain, 1.0).unwrap_err();
        assert_eq!(err, SurveyError::UnknownResponse("nope".into()));
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut survey = Survey::new("pilot");
        let first = survey.responses()[0].id.clone();
        let second = survey.add_response();
        assert!(survey.remove_response(&first).is_ok());
        assert_eq!(survey.remove_response(&second), Err(SurveyError::LastResponse));
        assert_eq!(survey.len(), 1);
    }

    #[test]
    fn invalid_rows_stay_in_survey() {
        let rows = vec![
            CustomerResponse::new("a", 10.0, 5.0, 20.0, 30.0),
            CustomerResponse::new("b", 5.0, 10.0, 20.0, 30.0),
        ];
        let survey = Survey::with_responses("pilot", rows);
        assert_eq!(survey.len(), 2);
        assert_eq!(survey.valid_count(), 1);
    }

    #[test]
    fn replace_refuses_empty_list() {
        let mut survey = Survey::new("pilot");
        assert_eq!(survey.replace_responses(Vec::new()), Err(SurveyError::LastResponse));
        survey
            .replace_responses(vec![CustomerResponse::new("x", 1.0, 2.0, 3.0, 4.0)])
            .unwrap();
        assert_eq!(survey.responses()[0].id, "x");
    }
}
