//! Rule routing
//!
//! Each rule's inclusion mode is resolved once into a [`Route`] that carries the
//! operation to run. The [`ExtractionPlan`] orders the routed rules for a run.

use super::operation::{CollapseQuery, Operation, PairQuery};
use super::rules::{InclusionMode, Rule, RuleTable};
use std::collections::BTreeMap;
use tracing::debug;

/// Classification of a routed rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    DirectInclude,
    IncludeSwapped,
    CrossMap,
    PropertyWrite,
    Skip,
}

/// A routed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    DirectInclude(Operation),
    IncludeSwapped(Operation),
    CrossMap(Operation),

    /// Recognized, not executed
    PropertyWrite,

    /// Recognized but no operation could be built
    Skip,
}

impl Route {
    pub fn bucket(&self) -> Bucket {
        match self {
            Route::DirectInclude(_) => Bucket::DirectInclude,
            Route::IncludeSwapped(_) => Bucket::IncludeSwapped,
            Route::CrossMap(_) => Bucket::CrossMap,
            Route::PropertyWrite => Bucket::PropertyWrite,
            Route::Skip => Bucket::Skip,
        }
    }

    pub fn operation(&self) -> Option<&Operation> {
        match self {
            Route::DirectInclude(op) | Route::IncludeSwapped(op) | Route::CrossMap(op) => Some(op),
            Route::PropertyWrite | Route::Skip => None,
        }
    }
}

/// Route one rule. Rules whose tag is not recognized get no route.
pub fn route(rule: &Rule) -> Option<Route> {
    let route = match rule.mode? {
        InclusionMode::Include => Route::DirectInclude(Operation::Pair(PairQuery::for_rule(rule, false))),
        InclusionMode::IncludeSwitched => Route::IncludeSwapped(Operation::Pair(PairQuery::for_rule(rule, true))),
        InclusionMode::IdMapping => Route::CrossMap(Operation::Pair(PairQuery::for_rule(rule, false))),
        InclusionMode::RdfEdge => match CollapseQuery::for_rule(rule) {
            Some(query) => Route::DirectInclude(Operation::Collapse(query)),
            None => Route::Skip,
        },
        InclusionMode::PropertyWrite => Route::PropertyWrite,
    };
    Some(route)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub rule: Rule,
    pub route: Route,
}

/// Routed rules in execution order: table order, property writes last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionPlan {
    steps: Vec<PlannedStep>,
}

impl ExtractionPlan {
    pub fn from_table(table: &RuleTable) -> Self {
        let mut steps = Vec::with_capacity(table.len());
        let mut deferred = Vec::new();

        for rule in table.rules() {
            let Some(route) = route(rule) else {
                debug!("Ignoring rule with unknown tag: {}", rule);
                continue;
            };
            let step = PlannedStep {
                rule: rule.clone(),
                route,
            };
            if step.route.bucket() == Bucket::PropertyWrite {
                deferred.push(step);
            } else {
                steps.push(step);
            }
        }

        steps.extend(deferred);
        Self { steps }
    }

    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.steps.iter().filter_map(|step| step.route.operation())
    }

    pub fn bucket_counts(&self) -> BTreeMap<Bucket, usize> {
        let mut counts = BTreeMap::new();
        for step in &self.steps {
            *counts.entry(step.route.bucket()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::reactome::operation::IntermediatePosition;

    #[test]
    fn test_unknown_tag_has_no_route() {
        assert_eq!(route(&Rule::new("Pathway", "hasEvent", "Pathway", "Exclude")), None);
    }

    #[test]
    fn test_buckets() {
        let cases = [
            ("Include", Bucket::DirectInclude),
            ("Include/SwitchSO", Bucket::IncludeSwapped),
            ("IDMapping/Include", Bucket::CrossMap),
            ("Provenance/Include", Bucket::PropertyWrite),
            ("Attribute/Include", Bucket::PropertyWrite),
            ("RDF_edges/Include", Bucket::Skip),
        ];
        for (tag, bucket) in cases {
            let routed = route(&Rule::new("Pathway", "hasEvent", "Pathway", tag)).unwrap();
            assert_eq!(routed.bucket(), bucket, "tag {tag}");
        }
    }

    #[test]
    fn test_switch_flag_follows_tag() {
        let routed = route(&Rule::new("ReactionLikeEvent", "precedingEvent", "ReactionLikeEvent", "Include/SwitchSO")).unwrap();
        match routed.operation() {
            Some(Operation::Pair(q)) => assert!(q.switch),
            other => panic!("unexpected operation: {other:?}"),
        }

        let routed = route(&Rule::new("ReactionLikeEvent", "precedingEvent", "ReactionLikeEvent", "Include")).unwrap();
        match routed.operation() {
            Some(Operation::Pair(q)) => assert!(!q.switch),
            other => panic!("unexpected operation: {other:?}"),
        }
    }

    #[test]
    fn test_collapsible_rdf_rule_is_direct_include() {
        let routed = route(&Rule::new("ReactionLikeEvent", "catalystActivity", "CatalystActivity", "RDF_edges/Include")).unwrap();
        assert_eq!(routed.bucket(), Bucket::DirectInclude);
        match routed.operation() {
            Some(Operation::Collapse(q)) => assert_eq!(q.intermediate, IntermediatePosition::Object),
            other => panic!("unexpected operation: {other:?}"),
        }
    }

    #[test]
    fn test_plan_defers_property_writes() {
        let table = RuleTable::new(vec![
            Rule::new("Pathway", "summation", "Summation", "Provenance/Include"),
            Rule::new("Pathway", "hasEvent", "Pathway", "Include"),
            Rule::new("Pathway", "odd", "Pathway", "Unknown"),
            Rule::new("Complex", "hasComponent", "Complex", "IDMapping/Include"),
        ]);
        let plan = ExtractionPlan::from_table(&table);

        let relations: Vec<&str> = plan.steps().iter().map(|s| s.rule.relation.as_str()).collect();
        assert_eq!(relations, vec!["hasEvent", "hasComponent", "summation"]);
        assert_eq!(plan.operations().count(), 2);

        let counts = plan.bucket_counts();
        assert_eq!(counts.get(&Bucket::PropertyWrite), Some(&1));
        assert_eq!(counts.get(&Bucket::Skip), None);
    }
}
