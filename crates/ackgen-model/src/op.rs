//! Operation classification.
//!
//! An operation identifier such as `DescribeDBInstances` is mapped to the
//! role it plays for a resource (`List` of `DBInstance`). Rules are an ordered
//! table of prefix/suffix matchers evaluated first-match-wins; configuration
//! can rename the resource or add further roles per operation.

use std::collections::BTreeMap;
use std::fmt;

use ackgen_api::Api;
use ackgen_config::GeneratorConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::inflect;

/// Role an operation plays for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpType {
    /// No rule matched.
    Unknown,
    /// Creates one resource.
    Create,
    /// Creates several resources at once.
    CreateBatch,
    /// Deletes a resource.
    Delete,
    /// Creates or replaces a resource.
    Replace,
    /// Modifies a resource.
    Update,
    /// Reads one resource.
    Get,
    /// Reads many resources.
    List,
    /// Reads a resource's attribute map.
    GetAttributes,
    /// Writes a resource's attribute map.
    SetAttributes,
}

impl OpType {
    /// Stable name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Create => "Create",
            Self::CreateBatch => "CreateBatch",
            Self::Delete => "Delete",
            Self::Replace => "Replace",
            Self::Update => "Update",
            Self::Get => "Get",
            Self::List => "List",
            Self::GetAttributes => "GetAttributes",
            Self::SetAttributes => "SetAttributes",
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OpType {
    /// Parse a configured operation type, ignoring case. Unrecognized names
    /// map to [`OpType::Unknown`].
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "create" => Self::Create,
            "createbatch" | "create_batch" => Self::CreateBatch,
            "delete" => Self::Delete,
            "replace" => Self::Replace,
            "update" => Self::Update,
            "get" | "readone" | "read_one" => Self::Get,
            "list" | "readmany" | "read_many" => Self::List,
            "getattributes" | "get_attributes" => Self::GetAttributes,
            "setattributes" | "set_attributes" => Self::SetAttributes,
            _ => Self::Unknown,
        }
    }
}

/// What a matched rule yields.
#[derive(Debug, Clone, Copy)]
enum Action {
    /// Always this role; the remainder is the resource name as-is.
    Fixed(OpType),
    /// Role depends on whether the remainder is plural.
    ///
    /// A plural remainder is singularized unless it is itself a configured
    /// resource name, in which case it is kept literally.
    ByNumber {
        singular: OpType,
        configured_plural: OpType,
        plural: OpType,
    },
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    prefix: &'static str,
    suffix: &'static str,
    action: Action,
}

const fn fixed(prefix: &'static str, suffix: &'static str, kind: OpType) -> Rule {
    Rule {
        prefix,
        suffix,
        action: Action::Fixed(kind),
    }
}

const fn by_number(
    prefix: &'static str,
    singular: OpType,
    configured_plural: OpType,
    plural: OpType,
) -> Rule {
    Rule {
        prefix,
        suffix: "",
        action: Action::ByNumber {
            singular,
            configured_plural,
            plural,
        },
    }
}

/// Classification rules in priority order.
const RULES: &[Rule] = &[
    fixed("CreateOrUpdate", "", OpType::Replace),
    by_number("BatchCreate", OpType::CreateBatch, OpType::CreateBatch, OpType::CreateBatch),
    by_number("CreateBatch", OpType::CreateBatch, OpType::CreateBatch, OpType::CreateBatch),
    by_number("Create", OpType::Create, OpType::Create, OpType::CreateBatch),
    fixed("Modify", "", OpType::Update),
    fixed("Update", "", OpType::Update),
    fixed("Delete", "", OpType::Delete),
    by_number("Describe", OpType::Get, OpType::List, OpType::List),
    fixed("Get", "Attributes", OpType::GetAttributes),
    by_number("Get", OpType::Get, OpType::Get, OpType::List),
    by_number("List", OpType::List, OpType::List, OpType::List),
    fixed("Set", "Attributes", OpType::SetAttributes),
];

impl Rule {
    fn remainder<'a>(&self, op_id: &'a str) -> Option<&'a str> {
        let rest = op_id.strip_prefix(self.prefix)?;
        let rest = if self.suffix.is_empty() {
            rest
        } else {
            rest.strip_suffix(self.suffix)?
        };
        (!rest.is_empty()).then_some(rest)
    }
}

/// Inferred role and resource name of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Inferred role.
    pub kind: OpType,
    /// Inferred resource name; the raw identifier when no rule matched.
    pub resource_name: String,
}

/// Classify `op_id` using the rule table.
///
/// `is_configured_resource` answers whether a plural candidate is itself a
/// configured resource name (`DhcpOptions`), which keeps it unsingularized.
///
/// # Examples
///
/// ```
/// use ackgen_model::op::{OpType, classify};
///
/// let c = classify("DescribeDBInstances", |_| false);
/// assert_eq!(c.kind, OpType::List);
/// assert_eq!(c.resource_name, "DBInstance");
/// ```
pub fn classify(op_id: &str, is_configured_resource: impl Fn(&str) -> bool) -> Classification {
    for rule in RULES {
        let Some(rest) = rule.remainder(op_id) else {
            continue;
        };
        let (kind, resource_name) = match rule.action {
            Action::Fixed(kind) => (kind, rest.to_owned()),
            Action::ByNumber {
                singular,
                configured_plural,
                plural,
            } => {
                if !inflect::is_plural(rest) {
                    (singular, rest.to_owned())
                } else if is_configured_resource(rest) {
                    (configured_plural, rest.to_owned())
                } else {
                    (plural, inflect::singularize(rest))
                }
            }
        };
        return Classification {
            kind,
            resource_name,
        };
    }
    Classification {
        kind: OpType::Unknown,
        resource_name: op_id.to_owned(),
    }
}

/// Classify `op_id` and apply its per-operation overrides.
///
/// Returns every role the operation plays (the inferred one first) and the
/// resource it belongs to.
#[must_use]
pub fn classify_with_config(op_id: &str, config: &GeneratorConfig) -> (Vec<OpType>, String) {
    let Classification {
        kind,
        mut resource_name,
    } = classify(op_id, |name| config.resource_is_configured(name));
    let mut kinds = vec![kind];
    if let Some(op_config) = config.operation_config(op_id) {
        if let Some(name) = op_config.resource_name.as_deref().filter(|n| !n.is_empty()) {
            resource_name = name.to_owned();
        }
        for configured in &op_config.operation_type {
            let extra = OpType::from(configured.as_str());
            if extra == OpType::Unknown {
                warn!(operation = op_id, operation_type = %configured, "unknown configured operation type");
            }
            if !kinds.contains(&extra) {
                kinds.push(extra);
            }
        }
    }
    (kinds, resource_name)
}

/// Operation ids indexed by role and resource name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationMap {
    by_kind: BTreeMap<OpType, BTreeMap<String, String>>,
}

impl OperationMap {
    /// Classify every operation of `api`, skipping ignored operations.
    ///
    /// When two operations claim the same role for the same resource, the one
    /// with the later identifier wins.
    #[must_use]
    pub fn build(api: &Api, config: &GeneratorConfig) -> Self {
        let mut by_kind: BTreeMap<OpType, BTreeMap<String, String>> = BTreeMap::new();
        for op_id in api.operation_names() {
            if config.operation_is_ignored(op_id) {
                debug!(operation = op_id, "skipping ignored operation");
                continue;
            }
            let (kinds, resource_name) = classify_with_config(op_id, config);
            for kind in kinds {
                by_kind
                    .entry(kind)
                    .or_default()
                    .insert(resource_name.clone(), op_id.to_owned());
            }
        }
        Self { by_kind }
    }

    /// Operation playing `kind` for `resource`.
    #[must_use]
    pub fn get(&self, kind: OpType, resource: &str) -> Option<&str> {
        self.by_kind
            .get(&kind)
            .and_then(|ops| ops.get(resource))
            .map(String::as_str)
    }

    /// Resource names with an operation playing `kind`, sorted.
    pub fn resources(&self, kind: OpType) -> impl Iterator<Item = &str> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flat_map(BTreeMap::keys)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use ackgen_api::ApiBuilder;

    use super::*;

    fn unconfigured(_: &str) -> bool {
        false
    }

    #[test]
    fn test_should_classify_by_prefix_priority() {
        let cases = [
            ("CreateOrUpdateStack", OpType::Replace, "Stack"),
            ("BatchCreateTopics", OpType::CreateBatch, "Topic"),
            ("CreateBatchWidget", OpType::CreateBatch, "Widget"),
            ("CreateBook", OpType::Create, "Book"),
            ("CreateBooks", OpType::CreateBatch, "Book"),
            ("ModifyDBInstance", OpType::Update, "DBInstance"),
            ("UpdateBook", OpType::Update, "Book"),
            ("DeleteBook", OpType::Delete, "Book"),
            ("DescribeBook", OpType::Get, "Book"),
            ("DescribeBooks", OpType::List, "Book"),
            ("GetQueueAttributes", OpType::GetAttributes, "Queue"),
            ("GetBook", OpType::Get, "Book"),
            ("GetBooks", OpType::List, "Book"),
            ("ListBooks", OpType::List, "Book"),
            ("SetQueueAttributes", OpType::SetAttributes, "Queue"),
        ];
        for (op_id, kind, resource) in cases {
            let c = classify(op_id, unconfigured);
            assert_eq!(c.kind, kind, "kind of {op_id}");
            assert_eq!(c.resource_name, resource, "resource of {op_id}");
        }
    }

    #[test]
    fn test_should_fall_back_to_unknown() {
        for op_id in ["TagResource", "SetQueuePolicy", "Create", "PutBucketPolicy"] {
            let c = classify(op_id, unconfigured);
            assert_eq!(c.kind, OpType::Unknown);
            assert_eq!(c.resource_name, op_id);
        }
    }

    #[test]
    fn test_should_keep_configured_plural_names() {
        let is_dhcp = |name: &str| name.eq_ignore_ascii_case("DhcpOptions");
        let create = classify("CreateDhcpOptions", is_dhcp);
        assert_eq!((create.kind, create.resource_name.as_str()), (OpType::Create, "DhcpOptions"));
        let describe = classify("DescribeDhcpOptions", is_dhcp);
        assert_eq!((describe.kind, describe.resource_name.as_str()), (OpType::List, "DhcpOptions"));
        let get = classify("GetDhcpOptions", is_dhcp);
        assert_eq!((get.kind, get.resource_name.as_str()), (OpType::Get, "DhcpOptions"));

        let plain = classify("CreateDhcpOptions", unconfigured);
        assert_eq!(plain.kind, OpType::CreateBatch);
        assert_eq!(plain.resource_name, "DhcpOption");
    }

    #[test]
    fn test_should_parse_configured_op_types() {
        assert_eq!(OpType::from("ReadOne"), OpType::Get);
        assert_eq!(OpType::from("read_many"), OpType::List);
        assert_eq!(OpType::from("CREATE"), OpType::Create);
        assert_eq!(OpType::from("get_attributes"), OpType::GetAttributes);
        assert_eq!(OpType::from("nonsense"), OpType::Unknown);
        assert_eq!(OpType::SetAttributes.to_string(), "SetAttributes");
    }

    #[test]
    fn test_should_apply_operation_overrides() {
        let config = GeneratorConfig::from_yaml_str(
            r"
operations:
  PutBookPolicy:
    resource_name: Book
    operation_type: [Update, Create]
",
        )
        .expect("config");
        let (kinds, resource) = classify_with_config("PutBookPolicy", &config);
        assert_eq!(kinds, vec![OpType::Unknown, OpType::Update, OpType::Create]);
        assert_eq!(resource, "Book");
    }

    #[test]
    fn test_should_index_operations_skipping_ignored() {
        let api = ApiBuilder::new("books")
            .operation("CreateBook", None, None)
            .operation("DescribeBooks", None, None)
            .operation("DeleteBook", None, None)
            .operation("CreateAuthor", None, None)
            .build()
            .expect("api");
        let config =
            GeneratorConfig::from_yaml_str("ignore:\n  operations: [DeleteBook]\n").expect("config");
        let map = OperationMap::build(&api, &config);
        assert_eq!(map.get(OpType::Create, "Book"), Some("CreateBook"));
        assert_eq!(map.get(OpType::List, "Book"), Some("DescribeBooks"));
        assert_eq!(map.get(OpType::Delete, "Book"), None);
        assert_eq!(
            map.resources(OpType::Create).collect::<Vec<_>>(),
            vec!["Author", "Book"]
        );
    }
}
