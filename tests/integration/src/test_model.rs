//! Model construction over the bookstore fixtures.

#[cfg(test)]
mod tests {
    use ackgen_model::{FieldType, Model, ModelOptions};

    use crate::{BOOKSTORE_V1ALPHA1, GENERATOR_V1ALPHA1, bookstore_model, load_api};

    fn names<V>(fields: &std::collections::BTreeMap<String, V>) -> Vec<&str> {
        fields.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_should_build_resources_from_create_operations() {
        let model = bookstore_model("v1alpha1");
        let resources: Vec<&str> = model.resources().iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(resources, vec!["Book", "Shelf"]);

        let book = model.resource("Book").expect("book");
        assert_eq!(book.ops.create.as_deref(), Some("CreateBook"));
        assert_eq!(book.ops.read_one.as_deref(), Some("DescribeBook"));
        assert_eq!(book.ops.delete.as_deref(), Some("DeleteBook"));
        assert_eq!(book.plural, "Books");
        assert_eq!(book.short_names, vec!["bk"]);
        assert!(book.spec_fields["Name"].is_required);
    }

    #[test]
    fn test_should_keep_spec_and_status_disjoint() {
        let model = bookstore_model("v1alpha1");
        for resource in model.resources() {
            for name in resource.spec_fields.keys() {
                assert!(
                    !resource.status_fields.contains_key(name),
                    "{} has {name} in both Spec and Status",
                    resource.kind
                );
            }
        }
        let book = model.resource("Book").expect("book");
        assert_eq!(names(&book.spec_fields), vec!["Author", "Isbn", "Name", "Tags", "Year"]);
        assert_eq!(names(&book.status_fields), vec!["BookArn", "Status"]);
        let shelf = model.resource("Shelf").expect("shelf");
        assert_eq!(names(&shelf.spec_fields), vec!["Curator", "Name"]);
        assert_eq!(names(&shelf.status_fields), vec!["ShelfId"]);
    }

    #[test]
    fn test_should_register_reachable_type_defs_only() {
        let model = bookstore_model("v1alpha1");
        let defs: Vec<&str> = model.type_defs().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(defs, vec!["Author", "Tag"]);
        let book = model.resource("Book").expect("book");
        assert_eq!(
            book.field("Tags").expect("tags").field_type,
            FieldType::List {
                element: Box::new(FieldType::Structure {
                    name: "Tag".to_owned()
                })
            }
        );
        assert!(book.field("Tags..Key").expect("tag key").is_required);
    }

    #[test]
    fn test_should_suffix_enums_named_like_resource_types() {
        let model = bookstore_model("v1alpha1");
        let enums: Vec<&str> = model.enum_defs().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(enums, vec!["BookStatus_SDK"]);
        let values: Vec<&str> = model.enum_defs()[0]
            .values
            .iter()
            .map(|v| v.original.as_str())
            .collect();
        assert_eq!(values, vec!["AVAILABLE", "out-of-print"]);
    }

    #[test]
    fn test_should_share_secret_overrides_between_resources() {
        let model = bookstore_model("v1alpha1");
        let author = model.type_def("Author").expect("author");
        assert!(author.attr("Password").expect("password").field_type.is_secret());
        assert!(!author.attr("Name").expect("name").field_type.is_secret());

        let book = model.resource("Book").expect("book");
        assert!(book.field("Author.Password").expect("password").is_secret());
        let shelf = model.resource("Shelf").expect("shelf");
        assert_eq!(
            shelf.field("Curator").expect("curator").field_type,
            FieldType::Structure {
                name: "Author".to_owned()
            }
        );
    }

    #[test]
    fn test_should_locate_tag_fields() {
        let model = bookstore_model("v1alpha1");
        assert!(model.resource("Book").expect("book").tag_field().is_some());
        assert!(model.resource("Shelf").expect("shelf").tag_field().is_none());
    }

    #[test]
    fn test_should_build_identical_models_for_identical_inputs() {
        let first = bookstore_model("v1alpha1");
        let second = bookstore_model("v1alpha1");
        assert_eq!(first.resources(), second.resources());
        assert_eq!(first.type_defs(), second.type_defs());
        assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json")
        );
    }

    #[test]
    fn test_should_load_configuration_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("generator.yaml");
        std::fs::write(&path, GENERATOR_V1ALPHA1).expect("write");
        let config = ackgen_config::GeneratorConfig::from_path(&path).expect("config");
        let model = Model::new(load_api(BOOKSTORE_V1ALPHA1), config, ModelOptions::default()).expect("model");
        assert!(model.resource("Book").expect("book").field("Author.Password").expect("password").is_secret());
    }

    #[test]
    fn test_should_serialize_model_for_templates() {
        let model = bookstore_model("v1alpha1");
        let json = serde_json::to_value(&model).expect("json");
        assert_eq!(json["apiVersion"], "v1alpha1");
        assert_eq!(json["servicePackageName"], "bookstore");
        assert_eq!(json["resources"][0]["kind"], "Book");
        assert_eq!(json["resources"][0]["specFields"]["Author"]["fieldType"]["kind"], "structure");
    }
}
