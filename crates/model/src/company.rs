use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::ExampleData;

/// An operator of charging stations. Companies form a forest through their
/// optional parent company.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    #[serde(rename = "parentCompanyId", default)]
    pub parent_id: Option<Id<Company>>,
}

impl Company {
    pub fn new<S: Into<String>>(name: S, parent_id: Option<Id<Company>>) -> Self {
        Self {
            name: name.into(),
            parent_id,
        }
    }
}

impl HasId for Company {
    type IdType = i64;
}

impl ExampleData for Company {
    fn example_data() -> Self {
        Self {
            name: "Stadtwerke Kiel".to_owned(),
            parent_id: Some(Id::new(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::WithId;

    #[test]
    fn serializes_parent_as_parent_company_id() {
        let company = WithId::new(Id::new(2), Company::new("Child", Some(Id::new(1))));
        assert_eq!(
            serde_json::to_value(&company).unwrap(),
            json!({ "id": 2, "name": "Child", "parentCompanyId": 1 })
        );
    }

    #[test]
    fn root_company_omits_parent() {
        let company = WithId::new(Id::new(1), Company::new("Root", None));
        assert_eq!(
            serde_json::to_value(&company).unwrap(),
            json!({ "id": 1, "name": "Root" })
        );
    }

    #[test]
    fn parent_is_optional_when_deserializing() {
        let company: Company = serde_json::from_str(r#"{ "name": "Root" }"#).unwrap();
        assert_eq!(company, Company::new("Root", None));

        let company: Company =
            serde_json::from_str(r#"{ "name": "Child", "parentCompanyId": null }"#)
                .unwrap();
        assert_eq!(company.parent_id, None);
    }
}
