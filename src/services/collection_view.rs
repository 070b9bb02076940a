//! Search, sort and pagination over the in-memory application list.
//!
//! The pipeline is pure: it never talks to the gateway and keeps no state
//! beyond the snapshot it is handed. Steps always run in the same order:
//! filter, then a stable sort, then the page slice.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::job_application::JobApplication;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    DateOfApplication,
    JobTitle,
    Company,
    Location,
    Status,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::DateOfApplication => "dateOfApplication",
            SortField::JobTitle => "jobTitle",
            SortField::Company => "company",
            SortField::Location => "location",
            SortField::Status => "status",
        }
    }

    fn compare(&self, a: &JobApplication, b: &JobApplication) -> Ordering {
        match self {
            SortField::DateOfApplication => a.date_of_application.cmp(&b.date_of_application),
            SortField::JobTitle => cmp_text(&a.job_title, &b.job_title),
            SortField::Company => cmp_text(&a.company, &b.company),
            SortField::Location => cmp_text(&a.location, &b.location),
            SortField::Status => a.status.cmp(&b.status),
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dateofapplication" | "date" => Ok(SortField::DateOfApplication),
            "jobtitle" | "title" => Ok(SortField::JobTitle),
            "company" => Ok(SortField::Company),
            "location" => Ok(SortField::Location),
            "status" => Ok(SortField::Status),
            other => Err(format!("unsupported sort field '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("unsupported sort order '{}'", other)),
        }
    }
}

/// Sort selection in the `field-order` form used by the sort selector,
/// e.g. `dateOfApplication-desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("expected '<field>-<asc|desc>', got '{}'", s))?;
        Ok(SortSpec {
            field: field.parse()?,
            order: order.parse()?,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.field, self.order)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_query: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            search_query: String::new(),
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// A new query changes the result set, so paging restarts at 1.
    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search_query {
            self.search_query = query;
            self.page = 1;
        }
    }

    pub fn set_sort(&mut self, spec: SortSpec) {
        self.sort_field = spec.field;
        self.sort_order = spec.order;
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec {
            field: self.sort_field,
            order: self.sort_order,
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    fn effective_page(&self) -> usize {
        self.page.max(1)
    }

    fn effective_page_size(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// One rendered page of the list.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice {
    pub items: Vec<JobApplication>,
    pub page: usize,
    pub page_size: usize,
    /// Records left after filtering.
    pub total_items: usize,
    pub total_pages: usize,
}

impl PageSlice {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

pub fn filter(records: &[JobApplication], query: &str) -> Vec<JobApplication> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|app| app.matches(&needle))
        .cloned()
        .collect()
}

/// Stable in both directions: equal keys keep their input order.
pub fn sort(records: &mut [JobApplication], field: SortField, order: SortOrder) {
    records.sort_by(|a, b| match order {
        SortOrder::Asc => field.compare(a, b),
        SortOrder::Desc => field.compare(b, a),
    });
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

pub fn paginate(records: &[JobApplication], page: usize, page_size: usize) -> Vec<JobApplication> {
    let page_size = page_size.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    records.iter().skip(start).take(page_size).cloned().collect()
}

pub fn apply(records: &[JobApplication], view: &ViewState) -> PageSlice {
    let mut visible = filter(records, &view.search_query);
    sort(&mut visible, view.sort_field, view.sort_order);

    let page = view.effective_page();
    let page_size = view.effective_page_size();
    let total_items = visible.len();

    PageSlice {
        items: paginate(&visible, page, page_size),
        page,
        page_size,
        total_items,
        total_pages: page_count(total_items, page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job_application::Status;
    use crate::utils::time::parse_flexible;

    fn app(id: &str, title: &str, company: &str, date: &str) -> JobApplication {
        JobApplication {
            id: id.into(),
            job_url: format!("https://jobs.example.com/{}", id),
            job_title: title.into(),
            date_of_application: parse_flexible(date).unwrap(),
            company: company.into(),
            location: "Remote".into(),
            status: Status::Applied,
        }
    }

    fn ids(records: &[JobApplication]) -> Vec<&str> {
        records.iter().map(|a| a.id.as_str()).collect()
    }

    fn seven() -> Vec<JobApplication> {
        (1..=7)
            .map(|i| {
                app(
                    &i.to_string(),
                    &format!("Engineer {}", i),
                    "Acme",
                    &format!("2024-01-{:02}", i),
                )
            })
            .collect()
    }

    #[test]
    fn second_page_of_seven_holds_two() {
        let records = seven();
        let mut view = ViewState::with_page_size(5);
        view.set_page(2);

        let page = apply(&records, &view);

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_company() {
        let records = vec![
            app("1", "Rust Developer", "Ferrous", "2024-01-01"),
            app("2", "Frontend Dev", "RUSTy Corp", "2024-01-02"),
            app("3", "Accountant", "Ledger Inc", "2024-01-03"),
        ];

        assert_eq!(ids(&filter(&records, "rust")), vec!["1", "2"]);
        assert_eq!(ids(&filter(&records, "LEDGER")), vec!["3"]);
        assert_eq!(ids(&filter(&records, "")), vec!["1", "2", "3"]);
        assert!(filter(&records, "remote").is_empty());
    }

    #[test]
    fn date_sort_is_stable_in_both_directions() {
        let mut records = vec![
            app("a", "A", "X", "2024-02-01"),
            app("b", "B", "X", "2024-01-01"),
            app("c", "C", "X", "2024-02-01"),
            app("d", "D", "X", "2024-03-01"),
        ];

        sort(&mut records, SortField::DateOfApplication, SortOrder::Asc);
        assert_eq!(ids(&records), vec!["b", "a", "c", "d"]);

        sort(&mut records, SortField::DateOfApplication, SortOrder::Desc);
        assert_eq!(ids(&records), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn reversing_order_reverses_output_for_unique_dates() {
        let records = vec![
            app("1", "A", "X", "2024-05-03"),
            app("2", "B", "X", "2023-11-20"),
            app("3", "C", "X", "2024-01-15"),
            app("4", "D", "X", "2024-08-09"),
        ];
        let mut asc = records.clone();
        sort(&mut asc, SortField::DateOfApplication, SortOrder::Asc);
        let mut desc = records;
        sort(&mut desc, SortField::DateOfApplication, SortOrder::Desc);

        desc.reverse();
        assert_eq!(ids(&asc), ids(&desc));
    }

    #[test]
    fn pages_reconstruct_the_filtered_sequence_exactly_once() {
        let mut records = seven();
        records.push(app("x", "Barista", "Bean Co", "2024-01-09"));
        records.push(app("y", "Engineer Lead", "Acme", "2024-01-08"));

        for page_size in 1..=10 {
            let mut view = ViewState::with_page_size(page_size);
            view.set_search("engineer");

            let first = apply(&records, &view);
            assert_eq!(first.total_items, 8);
            assert_eq!(first.total_pages, page_count(8, page_size));

            let mut collected = Vec::new();
            for page in 1..=first.total_pages {
                view.set_page(page);
                collected.extend(apply(&records, &view).items);
            }

            let mut expected = filter(&records, "engineer");
            sort(&mut expected, view.sort_field, view.sort_order);
            assert_eq!(ids(&collected), ids(&expected), "page size {}", page_size);
        }
    }

    #[test]
    fn page_count_follows_filtered_total() {
        let records = seven();
        let mut view = ViewState::with_page_size(5);
        view.set_search("Engineer 7");

        let page = apply(&records, &view);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn page_count_is_ceiling() {
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(7, 0), 7);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let mut view = ViewState::with_page_size(5);
        view.set_page(9);
        assert!(apply(&seven(), &view).items.is_empty());
    }

    #[test]
    fn changing_the_query_resets_the_page() {
        let mut view = ViewState::default();
        view.set_page(3);
        view.set_search("acme");
        assert_eq!(view.page, 1);

        view.set_page(2);
        view.set_search("acme");
        assert_eq!(view.page, 2);
    }

    #[test]
    fn other_fields_sort_case_insensitively() {
        let mut records = vec![
            app("1", "zeta", "b", "2024-01-01"),
            app("2", "Alpha", "A", "2024-01-02"),
            app("3", "beta", "c", "2024-01-03"),
        ];
        sort(&mut records, SortField::JobTitle, SortOrder::Asc);
        assert_eq!(ids(&records), vec!["2", "3", "1"]);

        sort(&mut records, SortField::Company, SortOrder::Desc);
        assert_eq!(ids(&records), vec!["3", "1", "2"]);
    }

    #[test]
    fn sort_spec_parses_selector_values() {
        let spec: SortSpec = "dateOfApplication-asc".parse().unwrap();
        assert_eq!(spec.field, SortField::DateOfApplication);
        assert_eq!(spec.order, SortOrder::Asc);
        assert_eq!(spec.to_string(), "dateOfApplication-asc");

        assert!("salary-desc".parse::<SortSpec>().is_err());
        assert!("date".parse::<SortSpec>().is_err());
        assert!("date-sideways".parse::<SortSpec>().is_err());
    }

    #[test]
    fn defaults_match_the_home_view() {
        let view = ViewState::default();
        assert_eq!(view.sort_spec().to_string(), "dateOfApplication-desc");
        assert_eq!(view.page, 1);
        assert_eq!(view.page_size, 5);
    }
}
