//! Typed document filters.
//!
//! A [`Filter`] can only be built through the per-entity constructors below,
//! so every query the store runs has a known collection and a known set of
//! equality clauses. Prescription filters that identify a single record always
//! carry the owner.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Prescriptions,
    Users,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Prescriptions => "prescriptions",
            Collection::Users => "users",
        }
    }
}

/// Document fields that filters and updates may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Owner,
    Username,
    Name,
    Directions,
    Time,
}

impl Field {
    /// JSON path of the field inside a document body.
    pub(crate) fn json_path(self) -> &'static str {
        match self {
            Field::Id => "$.id",
            Field::Owner => "$.owner",
            Field::Username => "$.username",
            Field::Name => "$.name",
            Field::Directions => "$.directions",
            Field::Time => "$.time",
        }
    }

    /// SQL expression selecting the field. `id` is a real column.
    fn column(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Owner => "json_extract(body, '$.owner')",
            Field::Username => "json_extract(body, '$.username')",
            Field::Name => "json_extract(body, '$.name')",
            Field::Directions => "json_extract(body, '$.directions')",
            Field::Time => "json_extract(body, '$.time')",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    collection: Collection,
    clauses: Vec<(Field, String)>,
}

impl Filter {
    fn new(collection: Collection) -> Self {
        Self {
            collection,
            clauses: Vec::new(),
        }
    }

    fn and(mut self, field: Field, value: impl Into<String>) -> Self {
        self.clauses.push((field, value.into()));
        self
    }

    pub fn clauses(&self) -> &[(Field, String)] {
        &self.clauses
    }

    /// Render the WHERE clause. Placeholders are numbered from `first_param`;
    /// the returned parameters are in placeholder order, collection first.
    pub(crate) fn where_clause(&self, first_param: usize) -> (String, Vec<String>) {
        let mut sql = format!("collection = ?{}", first_param);
        let mut params = vec![self.collection.as_str().to_string()];

        for (field, value) in &self.clauses {
            sql.push_str(&format!(" AND {} = ?{}", field.column(), first_param + params.len()));
            params.push(value.clone());
        }

        (sql, params)
    }
}

pub struct PrescriptionFilter;

impl PrescriptionFilter {
    pub fn by_id_and_owner(id: &str, owner: &str) -> Filter {
        Filter::new(Collection::Prescriptions)
            .and(Field::Id, id)
            .and(Field::Owner, owner)
    }

    pub fn by_owner(owner: &str) -> Filter {
        Filter::new(Collection::Prescriptions).and(Field::Owner, owner)
    }
}

pub struct UserFilter;

impl UserFilter {
    pub fn by_username(username: &str) -> Filter {
        Filter::new(Collection::Users).and(Field::Username, username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_and_owner_filter_renders_both_clauses() {
        let filter = PrescriptionFilter::by_id_and_owner("abc", "alice");
        let (sql, params) = filter.where_clause(1);

        assert_eq!(
            sql,
            "collection = ?1 AND id = ?2 AND json_extract(body, '$.owner') = ?3"
        );
        assert_eq!(params, vec!["prescriptions", "abc", "alice"]);
    }

    #[test]
    fn placeholders_start_at_offset() {
        let (sql, params) = UserFilter::by_username("bob").where_clause(3);

        assert_eq!(sql, "collection = ?3 AND json_extract(body, '$.username') = ?4");
        assert_eq!(params, vec!["users", "bob"]);
    }

    #[test]
    fn owner_filter_constrains_only_the_owner() {
        let filter = PrescriptionFilter::by_owner("carol");
        assert_eq!(filter.clauses(), &[(Field::Owner, "carol".to_string())]);

        let (sql, params) = filter.where_clause(1);
        assert_eq!(sql, "collection = ?1 AND json_extract(body, '$.owner') = ?2");
        assert_eq!(params, vec!["prescriptions", "carol"]);
    }
}
