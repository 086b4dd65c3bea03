/// Declares an opaque document identifier. Identifiers are assigned by the document store and
/// never interpreted by the domain.
macro_rules! document_id {
    ($name:ident) => {
        #[derive(
            derive_more::Deref,
            derive_more::Display,
            Debug,
            Default,
            Clone,
            Hash,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    document_id!(TestID);

    #[test]
    fn test_document_id() {
        let id = TestID::from("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.len(), 3);
        assert_eq!(id, TestID::from("abc".to_string()));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
