//! Field path resolution over a loaded schema.

#[cfg(test)]
mod tests {
    use ackgen_api::{FieldPath, ShapeRef};

    use crate::{BOOKSTORE_V1ALPHA1, load_api};

    fn root(api: &ackgen_api::Api, name: &str) -> ShapeRef {
        ShapeRef::new(name, api.shape_id(name).expect("shape"))
    }

    #[test]
    fn test_should_round_trip_dotted_paths() {
        for dotted in ["Book", "Book.Author.Name", "CreateBookRequest.Tags.Key"] {
            assert_eq!(FieldPath::parse(dotted).to_string(), dotted);
        }
    }

    #[test]
    fn test_should_resolve_prefixes_consistently() {
        let api = load_api(BOOKSTORE_V1ALPHA1);
        let root = root(&api, "CreateBookRequest");
        let path = FieldPath::parse("CreateBookRequest.Author.Password");
        assert!(path.resolve(&api, &root).is_some());
        for index in 0..path.size() {
            assert_eq!(
                path.resolve_at(&api, &root, index),
                path.copy_at(index).resolve(&api, &root),
                "prefix {index}"
            );
        }
    }

    #[test]
    fn test_should_match_members_ignoring_case() {
        let api = load_api(BOOKSTORE_V1ALPHA1);
        let root = root(&api, "Book");
        let status = FieldPath::parse("Book.bookARN").resolve(&api, &root).expect("arn");
        assert_eq!(status.name, "String");
    }

    #[test]
    fn test_should_look_through_lists() {
        let api = load_api(BOOKSTORE_V1ALPHA1);
        let root = root(&api, "CreateBookRequest");
        let key = FieldPath::parse("CreateBookRequest.Tags.Key")
            .resolve(&api, &root)
            .expect("tag key");
        assert_eq!(api.target(key).name, "String");
        assert!(FieldPath::parse("CreateBookRequest.Tags.Missing").resolve(&api, &root).is_none());
    }
}
