//! Per-category gating and collection.

use std::collections::BTreeMap;

use tracing::debug;

use super::category::RegionCategory;
use super::params::{GatedParams, ParamValue, ParameterBundle};
use super::resolvers::Resolve;
use crate::collection::IntervalCollection;
use crate::error::Result;

/// Resolver output per category. Every category has an entry, possibly empty.
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    entries: BTreeMap<RegionCategory, Vec<IntervalCollection>>,
}

impl CategoryMap {
    fn with_all_categories() -> Self {
        Self {
            entries: RegionCategory::ALL
                .into_iter()
                .map(|category| (category, Vec::new()))
                .collect(),
        }
    }

    pub fn get(&self, category: RegionCategory) -> &[IntervalCollection] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Replace the collections of `category`.
    pub fn set(&mut self, category: RegionCategory, collections: Vec<IntervalCollection>) {
        self.entries.insert(category, collections);
    }

    /// Entries in fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionCategory, &[IntervalCollection])> {
        self.entries
            .iter()
            .map(|(category, collections)| (*category, collections.as_slice()))
    }

    /// Categories that produced at least one collection.
    pub fn active(&self) -> Vec<RegionCategory> {
        self.iter()
            .filter(|(_, collections)| !collections.is_empty())
            .map(|(category, _)| category)
            .collect()
    }
}

/// Runs each category's resolver when all of its parameters are present.
pub struct CategoryCollector<'a, R: Resolve> {
    bundle: &'a ParameterBundle,
    resolver: &'a R,
}

impl<'a, R: Resolve> CategoryCollector<'a, R> {
    pub fn new(bundle: &'a ParameterBundle, resolver: &'a R) -> Self {
        Self { bundle, resolver }
    }

    /// Gate and resolve every category in fixed order.
    ///
    /// A category whose required parameters are not all present yields an
    /// empty list and its resolver is never called. Resolver faults abort
    /// the whole collection.
    pub fn collect(&self) -> Result<CategoryMap> {
        let mut map = CategoryMap::with_all_categories();

        for category in RegionCategory::ALL {
            let Some(entries) = self.gate(category) else {
                continue;
            };

            let collections = self
                .resolver
                .resolve(category, GatedParams::new(&entries))?;
            debug!(
                %category,
                collections = collections.len(),
                features = collections.iter().map(IntervalCollection::len).sum::<usize>(),
                "category resolved"
            );
            map.set(category, collections);
        }

        Ok(map)
    }

    /// The category's parameters in declared order, or `None` if any is missing.
    fn gate(&self, category: RegionCategory) -> Option<Vec<(&'static str, &'a ParamValue)>> {
        let names = category.required_params();
        let values = self.bundle.extract(names);

        let missing: Vec<&str> = names
            .iter()
            .zip(&values)
            .filter(|(_, value)| !value.is_some_and(ParamValue::is_present))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            debug!(%category, ?missing, "category gated off");
            return None;
        }

        Some(names.iter().copied().zip(values.into_iter().flatten()).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::bed::parse_records;
    use crate::error::RemusError;

    /// Records every call and returns one fixed collection.
    #[derive(Default)]
    struct RecordingResolver {
        calls: Mutex<Vec<(RegionCategory, Vec<(String, ParamValue)>)>>,
        fail_on: Option<RegionCategory>,
    }

    impl Resolve for RecordingResolver {
        fn resolve(
            &self,
            category: RegionCategory,
            params: GatedParams<'_>,
        ) -> Result<Vec<IntervalCollection>> {
            let entries = params
                .entries()
                .iter()
                .map(|(name, value)| (name.to_string(), (*value).clone()))
                .collect();
            self.calls.lock().unwrap().push((category, entries));

            if self.fail_on == Some(category) {
                return Err(RemusError::Config("boom".to_string()));
            }
            Ok(vec![IntervalCollection::new(
                parse_records("chr1\t100\t200\n").unwrap(),
            )])
        }
    }

    fn genes_only() -> ParameterBundle {
        ParameterBundle::new()
            .with("genes", vec!["BRCA1"])
            .with("genome", "hg19")
    }

    #[test]
    fn test_only_complete_categories_run() {
        let bundle = genes_only();
        let resolver = RecordingResolver::default();

        let map = CategoryCollector::new(&bundle, &resolver).collect().unwrap();

        let calls = resolver.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, RegionCategory::Genes);
        assert_eq!(map.active(), vec![RegionCategory::Genes]);
        assert_eq!(map.iter().count(), RegionCategory::ALL.len());
        assert!(map.get(RegionCategory::EnhancersFantom5).is_empty());
    }

    #[test]
    fn test_params_passed_in_declared_order() {
        let bundle = genes_only()
            .with("tissues", vec!["brain"])
            .with("enhancers-encode-used", "on")
            .with("enhancers-encode-kbs-downstream", "0")
            .with("enhancers-encode-kbs-upstream", "1.5")
            .with("enhancers-encode-range", "any");
        let resolver = RecordingResolver::default();

        CategoryCollector::new(&bundle, &resolver).collect().unwrap();

        let calls = resolver.calls.lock().unwrap();
        let (category, entries) = &calls[1];
        assert_eq!(*category, RegionCategory::EnhancersEncode);
        let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, RegionCategory::EnhancersEncode.required_params());
    }

    #[test]
    fn test_empty_values_gate_the_category() {
        let bundle = genes_only()
            .with("tissues", vec!["brain"])
            .with("enhancers-fantom5-range", "all")
            .with("enhancers-fantom5-kbs-upstream", "")
            .with("enhancers-fantom5-kbs-downstream", "2")
            .with("enhancers-fantom5-used", "on");
        let resolver = RecordingResolver::default();

        let map = CategoryCollector::new(&bundle, &resolver).collect().unwrap();

        assert_eq!(map.active(), vec![RegionCategory::Genes]);
    }

    #[test]
    fn test_missing_genes_disables_everything() {
        let bundle = ParameterBundle::new().with("genome", "hg19");
        let resolver = RecordingResolver::default();

        let map = CategoryCollector::new(&bundle, &resolver).collect().unwrap();

        assert!(resolver.calls.lock().unwrap().is_empty());
        assert!(map.active().is_empty());
    }

    #[test]
    fn test_resolver_fault_propagates() {
        let bundle = genes_only();
        let resolver = RecordingResolver {
            fail_on: Some(RegionCategory::Genes),
            ..Default::default()
        };

        let result = CategoryCollector::new(&bundle, &resolver).collect();
        assert!(matches!(result, Err(RemusError::Config(_))));
    }
}
