use crate::{
    request::{Endpoint, Request, string_setters},
    requirements::Requirements,
    types::FieldSet,
};

/// Lists retrieval requests received in a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    /// First day of the range, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Last day of the range, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    pub page: Option<String>,
}

impl DateRange {
    pub fn new() -> Self {
        Self::default()
    }

    string_setters!(start_date, end_date);

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.to_string());
        self
    }
}

impl Request for DateRange {
    fn endpoint(&self) -> Endpoint {
        Endpoint::gateway("retrieval_requests/by_date", false)
    }

    fn structure(&self) -> FieldSet {
        FieldSet::new().with(
            "retrieval_request_request",
            FieldSet::new()
                .with("start_date", self.start_date.clone())
                .with("end_date", self.end_date.clone())
                .with("page", self.page.clone()),
        )
    }

    fn requirements(&self) -> Requirements {
        Requirements::required(["start_date"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::Error, pipeline};

    #[test]
    fn start_date_is_required() {
        let request = DateRange::new().end_date("2024-01-31");
        assert!(matches!(
            pipeline::build_document(request.structure(), &request.requirements()),
            Err(Error::BlankRequiredField(_))
        ));
    }

    #[test]
    fn optional_fields_are_dropped() {
        let request = DateRange::new().start_date("2024-01-01").page(2);
        let document = pipeline::build_document(request.structure(), &request.requirements()).unwrap();

        assert!(document.as_str().ends_with(
            "<retrieval_request_request><start_date>2024-01-01</start_date>\
             <page>2</page></retrieval_request_request>"
        ));
    }
}
