//! Version comparison over the bookstore fixtures.

#[cfg(test)]
mod tests {
    use ackgen_model::DiffError;
    use ackgen_model::multiversion::{FieldChangeType, FieldDelta};

    use crate::bookstore_versions;

    fn changes(deltas: &[FieldDelta]) -> Vec<(&str, FieldChangeType)> {
        deltas.iter().map(|d| (d.effective_name(), d.change_type)).collect()
    }

    #[test]
    fn test_should_expose_hub_and_spokes() {
        let versions = bookstore_versions();
        assert_eq!(versions.hub_version(), "v1");
        assert_eq!(versions.spoke_versions().collect::<Vec<_>>(), vec!["v1alpha1"]);
        assert_eq!(versions.model("v1").expect("hub").api_version(), "v1");
    }

    #[test]
    fn test_should_classify_book_changes() {
        let versions = bookstore_versions();
        let deltas = versions.compare_versions("v1alpha1", "v1").expect("deltas");
        let book = deltas["Book"].as_ref().expect("book");
        assert_eq!(
            changes(&book.spec_deltas),
            vec![
                ("Author", FieldChangeType::ShapeChanged),
                ("Isbn", FieldChangeType::ShapeChangedStringToSecret),
                ("Name", FieldChangeType::Unchanged),
                ("PublishedYear", FieldChangeType::Renamed),
                ("Tags", FieldChangeType::Unchanged),
            ]
        );
        let renamed = &book.spec_deltas[3];
        assert_eq!(renamed.source.as_ref().expect("source").names.original, "Year");
        assert!(book.status_deltas.iter().all(|d| d.change_type == FieldChangeType::Unchanged));
    }

    #[test]
    fn test_should_reverse_transitions_backwards() {
        let versions = bookstore_versions();
        let deltas = versions.compare_versions("v1", "v1alpha1").expect("deltas");
        let book = deltas["Book"].as_ref().expect("book");
        assert_eq!(
            changes(&book.spec_deltas),
            vec![
                ("Author", FieldChangeType::ShapeChanged),
                ("Isbn", FieldChangeType::ShapeChangedSecretToString),
                ("Name", FieldChangeType::Unchanged),
                ("Tags", FieldChangeType::Unchanged),
                ("Year", FieldChangeType::Renamed),
            ]
        );
    }

    #[test]
    fn test_should_compare_every_shared_resource() {
        let versions = bookstore_versions();
        let deltas = versions.compare_versions("v1alpha1", "v1").expect("deltas");
        assert_eq!(deltas.keys().collect::<Vec<_>>(), vec!["Book", "Shelf"]);
        let shelf = deltas["Shelf"].as_ref().expect("shelf");
        assert_eq!(
            changes(&shelf.spec_deltas),
            vec![
                ("Curator", FieldChangeType::ShapeChanged),
                ("Name", FieldChangeType::Unchanged),
            ]
        );
    }

    #[test]
    fn test_should_reject_comparing_a_version_with_itself() {
        let versions = bookstore_versions();
        assert!(matches!(
            versions.compare_versions("v1", "v1"),
            Err(DiffError::SameVersion { .. })
        ));
    }

    #[test]
    fn test_should_serialize_deltas() {
        let versions = bookstore_versions();
        let deltas = versions.compare_versions("v1alpha1", "v1").expect("deltas");
        let book = deltas["Book"].as_ref().expect("book");
        let json = serde_json::to_value(book).expect("json");
        assert_eq!(json["specDeltas"][3]["changeType"], "Renamed");
        assert!(json["specDeltas"][3]["source"].is_object());
    }
}
