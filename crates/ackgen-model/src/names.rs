//! Name normalization.
//!
//! Schema identifiers arrive in whatever casing the service team chose
//! (`DbInstanceId`, `DBInstanceID`, `SSEKMSKeyId`). [`Names`] splits an
//! identifier into words, normalizes well-known initialisms and renders the
//! variants generated code needs.

use heck::{ToSnakeCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};

/// Lowercase word to its canonical initialism spelling. Sorted by key.
const INITIALISMS: &[(&str, &str)] = &[
    ("acl", "ACL"),
    ("ami", "AMI"),
    ("amis", "AMIs"),
    ("api", "API"),
    ("arn", "ARN"),
    ("arns", "ARNs"),
    ("az", "AZ"),
    ("cidr", "CIDR"),
    ("cpu", "CPU"),
    ("db", "DB"),
    ("dbi", "DBI"),
    ("dns", "DNS"),
    ("dpd", "DPD"),
    ("ebs", "EBS"),
    ("ecmp", "ECMP"),
    ("edi", "EDI"),
    ("ena", "ENA"),
    ("http", "HTTP"),
    ("https", "HTTPS"),
    ("iam", "IAM"),
    ("id", "ID"),
    ("ids", "IDs"),
    ("io", "IO"),
    ("iops", "IOPS"),
    ("ip", "IP"),
    ("ips", "IPs"),
    ("json", "JSON"),
    ("kms", "KMS"),
    ("ldap", "LDAP"),
    ("nat", "NAT"),
    ("ram", "RAM"),
    ("sns", "SNS"),
    ("sqs", "SQS"),
    ("sriov", "SRIOV"),
    ("ssh", "SSH"),
    ("sse", "SSE"),
    ("ssl", "SSL"),
    ("tcp", "TCP"),
    ("tls", "TLS"),
    ("ttl", "TTL"),
    ("udp", "UDP"),
    ("uri", "URI"),
    ("url", "URL"),
    ("uuid", "UUID"),
    ("vlan", "VLAN"),
    ("vpc", "VPC"),
    ("vpn", "VPN"),
    ("xml", "XML"),
];

/// Words that cannot be used verbatim as identifiers in generated code.
const RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Case variants of one identifier.
///
/// # Examples
///
/// ```
/// use ackgen_model::Names;
///
/// let names = Names::new("DbInstanceId");
/// assert_eq!(names.camel, "DBInstanceID");
/// assert_eq!(names.camel_lower, "dbInstanceID");
/// assert_eq!(names.snake, "db_instance_id");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Names {
    /// The identifier as written in the schema.
    pub original: String,
    /// UpperCamelCase with normalized initialisms.
    pub camel: String,
    /// lowerCamelCase with normalized initialisms.
    pub camel_lower: String,
    /// snake_case.
    pub snake: String,
}

struct Word {
    lower: String,
    camel: String,
}

impl Names {
    /// Compute every variant of `original`.
    #[must_use]
    pub fn new(original: &str) -> Self {
        let words: Vec<Word> = split_words(original)
            .iter()
            .flat_map(|word| normalize(word))
            .collect();

        let camel: String = words.iter().map(|word| word.camel.as_str()).collect();
        let mut camel_lower = String::new();
        for (index, word) in words.iter().enumerate() {
            if index == 0 {
                camel_lower.push_str(&word.lower);
            } else {
                camel_lower.push_str(&word.camel);
            }
        }
        let mut snake = words
            .iter()
            .map(|word| word.lower.as_str())
            .collect::<Vec<_>>()
            .join("_");
        if RESERVED.contains(&camel_lower.as_str()) {
            camel_lower.push('_');
        }
        if RESERVED.contains(&snake.as_str()) {
            snake.push('_');
        }

        Self {
            original: original.to_owned(),
            camel,
            camel_lower,
            snake,
        }
    }
}

/// Split an identifier into words at case and digit boundaries.
///
/// A run of capitals followed by a lone `s` stays one word (`AMIs`, `IDs`).
pub(crate) fn split_words(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (index, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() && c.is_uppercase() {
            let prev = chars[index - 1];
            let next = chars.get(index + 1).copied();
            let starts_word = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase()
                    && next.is_some_and(char::is_lowercase)
                    && !is_plural_tail(&chars, index + 1));
            if starts_word {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn is_plural_tail(chars: &[char], index: usize) -> bool {
    chars.get(index) == Some(&'s')
        && chars
            .get(index + 1)
            .is_none_or(|next| next.is_uppercase() || !next.is_alphanumeric())
}

fn initialism(lower: &str) -> Option<&'static str> {
    INITIALISMS
        .binary_search_by_key(&lower, |(key, _)| key)
        .ok()
        .map(|index| INITIALISMS[index].1)
}

/// Normalize one split word, breaking all-capital runs into known initialisms
/// (`SSEKMS` becomes `SSE` + `KMS`).
fn normalize(word: &str) -> Vec<Word> {
    let lower = word.to_lowercase();
    if let Some(camel) = initialism(&lower) {
        return vec![Word {
            lower,
            camel: camel.to_owned(),
        }];
    }
    if word.chars().all(|c| c.is_uppercase() || c.is_ascii_digit()) {
        if let Some(parts) = decompose(&lower) {
            return parts;
        }
    }
    vec![Word {
        camel: lower.to_upper_camel_case(),
        lower: lower.to_snake_case(),
    }]
}

fn decompose(lower: &str) -> Option<Vec<Word>> {
    if lower.is_empty() {
        return Some(Vec::new());
    }
    (1..=lower.len()).rev().find_map(|end| {
        let head = lower.get(..end)?;
        let camel = initialism(head)?;
        let mut rest = decompose(&lower[end..])?;
        rest.insert(
            0,
            Word {
                lower: head.to_owned(),
                camel: camel.to_owned(),
            },
        );
        Some(rest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_normalize_initialisms() {
        let cases = [
            ("Ami", "AMI", "ami", "ami"),
            ("AmiLaunchIndex", "AMILaunchIndex", "amiLaunchIndex", "ami_launch_index"),
            ("Amis", "AMIs", "amis", "amis"),
            ("CacheSecurityGroup", "CacheSecurityGroup", "cacheSecurityGroup", "cache_security_group"),
            ("Camila", "Camila", "camila", "camila"),
            ("DbInstanceId", "DBInstanceID", "dbInstanceID", "db_instance_id"),
            ("DBInstanceId", "DBInstanceID", "dbInstanceID", "db_instance_id"),
            ("DBInstanceID", "DBInstanceID", "dbInstanceID", "db_instance_id"),
            ("DBInstanceIdentifier", "DBInstanceIdentifier", "dbInstanceIdentifier", "db_instance_identifier"),
            ("DbiResourceId", "DBIResourceID", "dbiResourceID", "dbi_resource_id"),
            ("Id", "ID", "id", "id"),
            ("ID", "ID", "id", "id"),
            ("Iops", "IOPS", "iops", "iops"),
            ("KeyIdentifier", "KeyIdentifier", "keyIdentifier", "key_identifier"),
            ("NatGateway", "NATGateway", "natGateway", "nat_gateway"),
            ("NumberOfAmiToKeep", "NumberOfAMIToKeep", "numberOfAMIToKeep", "number_of_ami_to_keep"),
            ("Package", "Package", "package_", "package_"),
            ("Param", "Param", "param", "param"),
            ("RepositoryUriTest", "RepositoryURITest", "repositoryURITest", "repository_uri_test"),
            ("SSEKMSKeyID", "SSEKMSKeyID", "sseKMSKeyID", "sse_kms_key_id"),
            ("UUID", "UUID", "uuid", "uuid"),
        ];
        for (original, camel, camel_lower, snake) in cases {
            let names = Names::new(original);
            assert_eq!(names.camel, camel, "camel of {original}");
            assert_eq!(names.camel_lower, camel_lower, "camel_lower of {original}");
            assert_eq!(names.snake, snake, "snake of {original}");
            assert_eq!(names.original, original);
        }
    }

    #[test]
    fn test_should_split_words_at_boundaries() {
        assert_eq!(split_words("DhcpOptions"), vec!["Dhcp", "Options"]);
        assert_eq!(split_words("VpcIDs"), vec!["Vpc", "IDs"]);
        assert_eq!(split_words("HTTPSettings"), vec!["HTTP", "Settings"]);
        assert_eq!(split_words("Ipv4Address"), vec!["Ipv4", "Address"]);
        assert_eq!(split_words("tag_key"), vec!["tag", "key"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_should_keep_camel_output_stable() {
        for original in ["DBInstanceID", "SecurityGroupIDs", "KMSKeyARN"] {
            let once = Names::new(original);
            let twice = Names::new(&once.camel);
            assert_eq!(once.camel, twice.camel);
        }
    }
}
