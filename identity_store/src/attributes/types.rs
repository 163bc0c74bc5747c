use std::collections::BTreeMap;

/// Attribute name to value mapping.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Capability of carrying an open-ended attribute mapping alongside the
/// fixed schema fields.
pub trait ExtraAttributes: Send + Sync {
    fn extra_attributes(&self) -> Attributes;
    fn set_extra_attributes(&mut self, attributes: Attributes);
}

/// Statements needed to turn the stored mapping into the desired one.
#[derive(Debug, Default, PartialEq)]
pub(super) struct Reconciliation<'a> {
    pub(super) insert: Vec<(&'a str, &'a serde_json::Value)>,
    pub(super) update: Vec<(&'a str, &'a serde_json::Value)>,
    pub(super) delete: Vec<&'a str>,
}

impl<'a> Reconciliation<'a> {
    pub(super) fn plan(current: &'a Attributes, desired: &'a Attributes) -> Self {
        let mut plan = Self::default();

        for (name, value) in desired {
            match current.get(name) {
                None => plan.insert.push((name.as_str(), value)),
                Some(stored) if stored != value => plan.update.push((name.as_str(), value)),
                Some(_) => {}
            }
        }

        plan.delete = current
            .keys()
            .filter(|name| !desired.contains_key(*name))
            .map(String::as_str)
            .collect();

        plan
    }

    pub(super) fn is_empty(&self) -> bool {
        self.insert.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}
