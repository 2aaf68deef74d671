//! The resource model of one service API version.

use ackgen_api::Api;
use ackgen_config::GeneratorConfig;
use serde::Serialize;
use tracing::info;

use crate::builder;
use crate::error::ModelResult;
use crate::options::ModelOptions;
use crate::resource::Resource;
use crate::sdk::SdkApi;
use crate::typedef::{EnumDef, TypeDef, TypeRegistry, enum_defs};

/// Resources, type definitions and enum definitions built from one API
/// schema and its generator configuration.
///
/// # Examples
///
/// ```
/// use ackgen_api::ApiBuilder;
/// use ackgen_config::GeneratorConfig;
/// use ackgen_model::{Model, ModelOptions};
///
/// let api = ApiBuilder::new("books")
///     .structure("CreateBookRequest", &[("Title", "String")])
///     .structure("CreateBookResponse", &[("BookId", "String")])
///     .string("String")
///     .operation("CreateBook", Some("CreateBookRequest"), Some("CreateBookResponse"))
///     .build()
///     .unwrap();
/// let model = Model::new(api, GeneratorConfig::default(), ModelOptions::default()).unwrap();
/// let book = model.resource("Book").unwrap();
/// assert!(book.is_spec_field("Title"));
/// assert!(book.is_status_field("BookId"));
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(skip)]
    sdk: SdkApi,
    #[serde(skip)]
    config: GeneratorConfig,
    #[serde(flatten)]
    options: ModelOptions,
    resources: Vec<Resource>,
    type_defs: TypeRegistry,
    enum_defs: Vec<EnumDef>,
}

impl Model {
    /// Build the model for `api` under `config`.
    ///
    /// Resources are built from the schema's Create operations, then custom
    /// nested fields are injected, field trees materialized, type definitions
    /// collected and nested field overrides propagated onto them.
    pub fn new(api: Api, config: GeneratorConfig, options: ModelOptions) -> ModelResult<Self> {
        let mut sdk = SdkApi::new(api, &config, &options.conflict_suffix)?;

        let drafts = sdk
            .resource_names(&config)
            .iter()
            .map(|name| builder::draft_resource(&sdk, &config, name))
            .collect::<ModelResult<Vec<_>>>()?;
        for draft in &drafts {
            builder::attach_custom_nested_fields(&mut sdk, &config, draft)?;
        }
        let mut resources = drafts
            .into_iter()
            .map(|draft| builder::finish_resource(&sdk, &config, draft))
            .collect::<ModelResult<Vec<_>>>()?;
        resources.sort_by(|a, b| a.names.original.cmp(&b.names.original));

        let mut type_defs = TypeRegistry::collect(&sdk, &resources);
        for resource in &resources {
            type_defs.propagate(&sdk, resource)?;
        }
        let enum_defs = enum_defs(&sdk);

        info!(
            service = %sdk.api().service_id,
            api_version = %options.api_version,
            resources = resources.len(),
            type_defs = type_defs.type_defs().len(),
            enum_defs = enum_defs.len(),
            "built model"
        );
        Ok(Self {
            sdk,
            config,
            options,
            resources,
            type_defs,
            enum_defs,
        })
    }

    /// Resources sorted by name.
    #[must_use]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Resource named `name`, matched by original or camel name.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|r| r.names.original == name || r.names.camel == name)
    }

    /// Type definitions sorted by name.
    #[must_use]
    pub fn type_defs(&self) -> &[TypeDef] {
        self.type_defs.type_defs()
    }

    /// Type definition named `name`.
    #[must_use]
    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.type_defs.get(name)
    }

    /// Enum definitions sorted by name.
    #[must_use]
    pub fn enum_defs(&self) -> &[EnumDef] {
        &self.enum_defs
    }

    /// Schema view the model was built from, including synthesized shapes.
    #[must_use]
    pub fn sdk(&self) -> &SdkApi {
        &self.sdk
    }

    /// The schema, after ignore rules and custom field injection.
    #[must_use]
    pub fn api(&self) -> &Api {
        self.sdk.api()
    }

    /// Generator configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build options.
    #[must_use]
    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// API version the model was built for.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.options.api_version
    }
}

#[cfg(test)]
mod tests {
    use ackgen_api::ApiBuilder;

    use super::*;
    use crate::error::ModelError;
    use crate::field::FieldType;

    const BOOKSTORE_CONFIG: &str = r"
resources:
  Book:
    fields:
      Author.Password:
        is_secret: true
      Author.Nickname:
        type: string
      PublisherId:
        references:
          resource: Publisher
          path: Status.ID
          service_name: publishing
      Isbn:
        is_read_only: true
        from:
          operation: DescribeBook
          path: Book.Name
  Shelf:
    tags:
      ignore: true
";

    fn bookstore_api() -> Api {
        ApiBuilder::new("bookstore")
            .structure(
                "CreateBookRequest",
                &[
                    ("Name", "String"),
                    ("Author", "Author"),
                    ("Tags", "TagList"),
                    ("PublisherId", "String"),
                    ("Shelf", "Shelf"),
                ],
            )
            .structure("CreateBookResponse", &[("Book", "Book")])
            .structure(
                "Book",
                &[
                    ("Name", "String"),
                    ("Author", "Author"),
                    ("BookArn", "String"),
                    ("Status", "BookStatus"),
                    ("Tags", "TagList"),
                ],
            )
            .structure("Author", &[("Name", "String"), ("Password", "String")])
            .structure("Shelf", &[("Name", "String")])
            .list("TagList", "Tag")
            .structure("Tag", &[("Key", "String"), ("Value", "String")])
            .enumeration("BookStatus", &["AVAILABLE", "out-of-print"])
            .structure("CreateShelfRequest", &[("Name", "String"), ("Curator", "Author")])
            .structure("CreateShelfResponse", &[("ShelfId", "String")])
            .structure("DescribeBookRequest", &[("Name", "String")])
            .structure("DescribeBookResponse", &[("Book", "Book")])
            .required("CreateBookRequest", &["Name"])
            .string("String")
            .operation("CreateBook", Some("CreateBookRequest"), Some("CreateBookResponse"))
            .operation("DescribeBook", Some("DescribeBookRequest"), Some("DescribeBookResponse"))
            .operation("DeleteBook", Some("DescribeBookRequest"), None)
            .operation("CreateShelf", Some("CreateShelfRequest"), Some("CreateShelfResponse"))
            .build()
            .expect("api")
    }

    fn bookstore() -> Model {
        let config = GeneratorConfig::from_yaml_str(BOOKSTORE_CONFIG).expect("config");
        Model::new(bookstore_api(), config, ModelOptions::default()).expect("model")
    }

    fn keys(fields: &std::collections::BTreeMap<String, crate::field::Field>) -> Vec<&str> {
        fields.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_should_split_spec_and_status_disjointly() {
        let model = bookstore();
        let book = model.resource("Book").expect("book");
        assert_eq!(
            keys(&book.spec_fields),
            vec!["Author", "Name", "PublisherId", "PublisherRef", "Shelf", "Tags"]
        );
        assert_eq!(keys(&book.status_fields), vec!["BookArn", "Isbn", "Status"]);
        assert!(book.spec_fields.keys().all(|k| !book.status_fields.contains_key(k)));
        assert!(book.spec_fields["Name"].is_required);
        assert_eq!(book.ops.read_one.as_deref(), Some("DescribeBook"));
        assert_eq!(book.ops.delete.as_deref(), Some("DeleteBook"));
        assert_eq!(book.plural, "Books");
    }

    #[test]
    fn test_should_list_resources_sorted() {
        let model = bookstore();
        let names: Vec<&str> = model.resources().iter().map(|r| r.names.original.as_str()).collect();
        assert_eq!(names, vec!["Book", "Shelf"]);
        assert_eq!(model.api_version(), "v1alpha1");
    }

    #[test]
    fn test_should_suffix_types_named_like_resources() {
        let model = bookstore();
        let book = model.resource("Book").expect("book");
        assert_eq!(
            book.spec_fields["Shelf"].field_type,
            FieldType::Structure {
                name: "Shelf_SDK".to_owned()
            }
        );
        assert!(model.type_def("Shelf_SDK").is_some());
        assert!(model.type_def("Shelf").is_none());
        assert!(model.type_def("Author").is_some());
    }

    #[test]
    fn test_should_source_configured_fields_from_other_operations() {
        let model = bookstore();
        let isbn = &model.resource("Book").expect("book").status_fields["Isbn"];
        assert_eq!(isbn.field_type, FieldType::string());
        assert!(isbn.is_read_only());
    }

    #[test]
    fn test_should_propagate_nested_secrets_to_shared_types() {
        let model = bookstore();
        let book = model.resource("Book").expect("book");
        assert!(book.field("Author.Password").expect("password").is_secret());

        let author = model.type_def("Author").expect("author");
        assert!(author.attr("Password").expect("attr").field_type.is_secret());

        // Shelf shares the Author shape; its field tree is unconfigured but
        // the shared type observes the override.
        let shelf = model.resource("Shelf").expect("shelf");
        let curator = shelf.field("Curator").expect("curator");
        assert_eq!(
            curator.field_type,
            FieldType::Structure {
                name: "Author".to_owned()
            }
        );
        assert!(!shelf.field("Curator.Password").expect("password").is_secret());
    }

    #[test]
    fn test_should_inject_custom_nested_fields_into_shared_shapes() {
        let model = bookstore();
        assert!(model.resource("Book").expect("book").field("Author.Nickname").is_some());
        assert!(model.resource("Shelf").expect("shelf").field("Curator.Nickname").is_some());
        assert!(model.type_def("Author").expect("author").attr("Nickname").is_some());
    }

    #[test]
    fn test_should_reject_custom_nested_field_under_scalar() {
        let config = GeneratorConfig::from_yaml_str(
            "resources:\n  Shelf:\n    fields:\n      Name.Extra:\n        type: string\n",
        )
        .expect("config");
        let err = Model::new(bookstore_api(), config, ModelOptions::default()).expect_err("scalar parent");
        assert!(matches!(err, ModelError::InvalidCustomNestedField { field, .. } if field == "Name.Extra"));
    }

    #[test]
    fn test_should_generate_reference_fields() {
        let model = bookstore();
        let book = model.resource("Book").expect("book");
        let reference = &book.spec_fields["PublisherRef"];
        assert_eq!(reference.field_type, FieldType::ResourceReference);
        assert!(reference.is_reference());
        assert!(reference.shape_ref.is_none());
        assert!(book.type_imports.contains("publishing"));
    }

    #[test]
    fn test_should_collect_enum_defs() {
        let model = bookstore();
        let enums = model.enum_defs();
        assert_eq!(enums.len(), 1);
        assert_eq!(enums[0].name, "BookStatus_SDK");
        let clean: Vec<&str> = enums[0].values.iter().map(|v| v.clean.as_str()).collect();
        assert_eq!(clean, vec!["Available", "OutOfPrint"]);
    }

    #[test]
    fn test_should_find_tag_fields_unless_ignored() {
        let model = bookstore();
        let tags = model.resource("Book").expect("book").tag_field().expect("tags");
        assert_eq!(tags.path, "Tags");
        assert!(model.resource("Shelf").expect("shelf").tag_field().is_none());
    }

    fn queue_api() -> Api {
        ApiBuilder::new("queues")
            .structure("CreateQueueRequest", &[("QueueName", "String"), ("Attributes", "AttributeMap")])
            .structure("CreateQueueResult", &[("QueueUrl", "String")])
            .map("AttributeMap", "String", "String")
            .string("String")
            .operation("CreateQueue", Some("CreateQueueRequest"), Some("CreateQueueResult"))
            .build()
            .expect("api")
    }

    const QUEUE_CONFIG: &str = r"
resources:
  Queue:
    unpack_attributes_map: {}
    fields:
      DelaySeconds:
        is_attribute: true
      Policy:
        is_attribute: true
      QueueArn:
        is_attribute: true
        is_read_only: true
";

    #[test]
    fn test_should_unpack_attribute_maps() {
        let config = GeneratorConfig::from_yaml_str(QUEUE_CONFIG).expect("config");
        let model = Model::new(queue_api(), config, ModelOptions::default()).expect("model");
        let queue = model.resource("Queue").expect("queue");
        assert_eq!(keys(&queue.spec_fields), vec!["DelaySeconds", "Policy", "QueueName"]);
        assert_eq!(keys(&queue.status_fields), vec!["QueueArn", "QueueUrl"]);
        assert_eq!(queue.spec_fields["DelaySeconds"].field_type, FieldType::string());
    }

    #[test]
    fn test_should_drop_primary_arn_with_resource_metadata() {
        let mut config = GeneratorConfig::from_yaml_str(QUEUE_CONFIG).expect("config");
        config.include_resource_metadata = true;
        let model = Model::new(queue_api(), config, ModelOptions::default()).expect("model");
        let queue = model.resource("Queue").expect("queue");
        assert_eq!(keys(&queue.status_fields), vec!["QueueUrl"]);
    }

    fn widget_api() -> Api {
        ApiBuilder::new("widgets")
            .structure("CreateWidgetRequest", &[("Widget", "WidgetInput"), ("DryRun", "String")])
            .structure("WidgetInput", &[("Name", "String"), ("Size", "String")])
            .structure("CreateWidgetResponse", &[("Widgets", "WidgetList"), ("RequestId", "String")])
            .list("WidgetList", "Widget")
            .structure("Widget", &[("Name", "String"), ("WidgetId", "String")])
            .string("String")
            .operation("CreateWidget", Some("CreateWidgetRequest"), Some("CreateWidgetResponse"))
            .build()
            .expect("api")
    }

    #[test]
    fn test_should_flatten_wrapper_members() {
        let config = GeneratorConfig::from_yaml_str(
            "operations:\n  CreateWidget:\n    input_wrapper_field_path: Widget\n    output_wrapper_field_path: Widgets\n",
        )
        .expect("config");
        let model = Model::new(widget_api(), config, ModelOptions::default()).expect("model");
        let widget = model.resource("Widget").expect("widget");
        assert_eq!(keys(&widget.spec_fields), vec!["Name", "Size"]);
        assert_eq!(keys(&widget.status_fields), vec!["WidgetId"]);
    }

    #[test]
    fn test_should_reject_wrapper_naming_a_scalar() {
        let config = GeneratorConfig::from_yaml_str(
            "operations:\n  CreateWidget:\n    input_wrapper_field_path: DryRun\n",
        )
        .expect("config");
        let err = Model::new(widget_api(), config, ModelOptions::default()).expect_err("scalar wrapper");
        assert!(matches!(err, ModelError::InvalidWrapperField { operation, .. } if operation == "CreateWidget"));
    }

    #[test]
    fn test_should_keep_multi_member_outputs_unwrapped() {
        let model = Model::new(widget_api(), GeneratorConfig::default(), ModelOptions::default())
            .expect("model");
        let widget = model.resource("Widget").expect("widget");
        assert_eq!(keys(&widget.spec_fields), vec!["DryRun", "Widget"]);
        assert_eq!(keys(&widget.status_fields), vec!["RequestId", "Widgets"]);
    }

    #[test]
    fn test_should_serialize_model_summary() {
        let model = bookstore();
        let json = serde_json::to_value(&model).expect("json");
        assert_eq!(json["apiVersion"], "v1alpha1");
        assert_eq!(json["resources"][0]["kind"], "Book");
        assert!(json["typeDefs"].as_array().is_some_and(|defs| !defs.is_empty()));
        assert_eq!(json["enumDefs"][0]["name"], "BookStatus_SDK");
    }
}
