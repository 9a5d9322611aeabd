//! Shared query infrastructure: the [`Query`] trait and the DataTables paging fields.

/// Number of columns the search listing renders. The DataTables backend
/// expects a descriptor for each one in every request.
const LISTING_COLUMNS: usize = 5;

/// Trait implemented by query builders for the search listing. Provides
/// form serialization and shared builder methods for paging.
pub trait Query {
    /// Serializes this query into the form body the endpoint expects.
    fn to_form(&self) -> Vec<(String, String)>;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the zero-based row offset of the requested page.
    fn with_start(mut self, start: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().start = start;
        self
    }

    /// Sets the number of rows per page.
    fn with_length(mut self, length: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().length = length;
        self
    }

    /// Sets the DataTables draw counter echoed back by the server.
    fn with_draw(mut self, draw: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().draw = draw;
        self
    }
}

/// Paging fields shared by listing queries.
#[derive(Clone, Copy, Debug)]
pub struct QueryCommon {
    /// DataTables draw counter. Defaults to 1.
    pub draw: i64,
    /// Zero-based offset of the first row.
    pub start: i64,
    /// Rows per page. Defaults to 100, the largest page the portal serves.
    pub length: i64,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            draw: 1,
            start: 0,
            length: 100,
        }
    }
}

impl QueryCommon {
    /// Appends paging, column descriptors and ordering to the form.
    ///
    /// Results are ordered by last name, then first name, so that
    /// consecutive pages are stable.
    pub fn append_to_form(&self, form: &mut Vec<(String, String)>) {
        form.push(("draw".into(), self.draw.to_string()));
        for i in 0..LISTING_COLUMNS {
            let prefix = format!("columns[{}]", i);
            form.push((format!("{}[data]", prefix), i.to_string()));
            form.push((format!("{}[name]", prefix), String::new()));
            form.push((format!("{}[searchable]", prefix), "true".into()));
            form.push((format!("{}[orderable]", prefix), "true".into()));
            form.push((format!("{}[search][value]", prefix), String::new()));
            form.push((format!("{}[search][regex]", prefix), "false".into()));
        }
        form.push(("order[0][column]".into(), "1".into()));
        form.push(("order[0][dir]".into(), "asc".into()));
        form.push(("order[1][column]".into(), "0".into()));
        form.push(("order[1][dir]".into(), "asc".into()));
        form.push(("start".into(), self.start.to_string()));
        form.push(("length".into(), self.length.to_string()));
        form.push(("search[value]".into(), String::new()));
        form.push(("search[regex]".into(), "false".into()));
    }
}
