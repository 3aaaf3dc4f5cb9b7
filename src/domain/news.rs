pub const NO_PICTURE: &str = "NA";

pub const RESULT_COLUMNS: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "Picture Name",
    "Count of search phrases",
    "Title or description contains any amount of money",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub title: String,
    pub date: String,
    pub description: String,
    pub picture_reference: String,
    pub phrase_match_count: usize,
    pub contains_monetary_mention: bool,
}

/// Records in extraction order. Rows can only be appended.
#[derive(Debug, Default)]
pub struct ResultTable {
    records: Vec<ResultRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        ResultTable::default()
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ResultRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }
}

/// Zero-based progress through the result pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: u32,
    total: u32,
    extracted: bool,
}

impl PageCursor {
    pub fn new(total: u32) -> Self {
        PageCursor {
            current: 0,
            total,
            extracted: false,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.current < self.total
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.total
    }

    /// True once the items of the current page are in the table and only the
    /// move to the next page is left.
    pub fn is_extracted(&self) -> bool {
        self.extracted
    }

    pub fn mark_extracted(&mut self) {
        self.extracted = true;
    }

    pub fn advance(&mut self) {
        self.current += 1;
        self.extracted = false;
    }
}
