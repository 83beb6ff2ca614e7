use crate::{
    cast::{
        ValueCaster,
        date::{DateResolver, PhraseResolver},
    },
    error::CompileError,
    predicate::{Condition, ConditionKind, Predicate, builder},
};
use model::{
    config::{CastingPolicy, SearchConfig, UnresolvedFieldPolicy},
    core::value::Value,
    field::{allowed::AllowedFields, registry::FieldRegistry},
};
use query_syntax::{Operator, QueryNode, RawValue};
use tracing::{debug, trace};

/// Policies applied by one compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub unresolved_fields: UnresolvedFieldPolicy,
    pub casting: CastingPolicy,
}

impl From<&SearchConfig> for CompileOptions {
    fn from(config: &SearchConfig) -> Self {
        CompileOptions {
            unresolved_fields: config.unresolved_fields,
            casting: config.casting,
        }
    }
}

/// Walks a parse tree and mirrors it onto a [`Predicate`] tree.
///
/// Compilation only reads the registry and never touches storage, so one
/// compiler can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct QueryCompiler<'r, R = PhraseResolver> {
    registry: &'r FieldRegistry,
    caster: ValueCaster<R>,
    unresolved_fields: UnresolvedFieldPolicy,
}

impl<'r> QueryCompiler<'r> {
    /// Compiler with default policies, reading datetimes in UTC.
    pub fn new(registry: &'r FieldRegistry) -> Self {
        QueryCompiler {
            registry,
            caster: ValueCaster::new(PhraseResolver::default()),
            unresolved_fields: UnresolvedFieldPolicy::default(),
        }
    }
}

impl<'r, R: DateResolver> QueryCompiler<'r, R> {
    pub fn with_policy(mut self, policy: UnresolvedFieldPolicy) -> Self {
        self.unresolved_fields = policy;
        self
    }

    pub fn with_casting(mut self, casting: CastingPolicy) -> Self {
        self.caster = self.caster.with_policy(casting);
        self
    }

    pub fn with_options(self, options: CompileOptions) -> Self {
        self.with_policy(options.unresolved_fields)
            .with_casting(options.casting)
    }

    pub fn with_resolver<S: DateResolver>(self, resolver: S) -> QueryCompiler<'r, S> {
        QueryCompiler {
            registry: self.registry,
            caster: ValueCaster::new(resolver).with_policy(self.caster.policy()),
            unresolved_fields: self.unresolved_fields,
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        self.registry
    }

    /// Parses `query` and compiles it. A blank query yields `None`, which
    /// callers treat as "no filter".
    pub fn compile_str(
        &self,
        query: &str,
        allowed: &AllowedFields,
    ) -> Result<Option<Predicate>, CompileError> {
        match query_syntax::parse(query)? {
            Some(node) => self.compile(&node, allowed).map(Some),
            None => {
                debug!(entity = self.registry.entity(), "Blank query, no filter");
                Ok(None)
            }
        }
    }

    pub fn compile(
        &self,
        node: &QueryNode,
        allowed: &AllowedFields,
    ) -> Result<Predicate, CompileError> {
        let predicate = self.compile_node(node, allowed)?;
        debug!(
            entity = self.registry.entity(),
            query = %node,
            leaves = node.leaf_count(),
            predicate = %predicate,
            "Compiled query"
        );
        Ok(predicate)
    }

    fn compile_node(
        &self,
        node: &QueryNode,
        allowed: &AllowedFields,
    ) -> Result<Predicate, CompileError> {
        match node {
            QueryNode::Term(text) => self.compile_term(text, allowed),
            QueryNode::Comparison {
                key,
                operator,
                value,
            } => self.compile_comparison(key, *operator, value, allowed),
            QueryNode::And(left, right) => Ok(Predicate::and(
                self.compile_node(left, allowed)?,
                self.compile_node(right, allowed)?,
            )),
            QueryNode::Or(left, right) => Ok(Predicate::or(
                self.compile_node(left, allowed)?,
                self.compile_node(right, allowed)?,
            )),
            QueryNode::Not(inner) => Ok(Predicate::not(self.compile_node(inner, allowed)?)),
        }
    }

    /// A bare term matches when any allowed field contains it.
    fn compile_term(&self, text: &str, allowed: &AllowedFields) -> Result<Predicate, CompileError> {
        if text.trim().is_empty() {
            return Err(CompileError::MalformedQuery("empty search term".into()));
        }

        let selection = self.registry.select(allowed);
        if let Some(name) = selection.unknown.first() {
            if self.unresolved_fields == UnresolvedFieldPolicy::Strict {
                return Err(CompileError::UnresolvedField(name.clone()));
            }
            trace!(unknown = ?selection.unknown, "Ignoring unregistered allowed fields");
        }

        if selection.fields.is_empty() {
            return Ok(Predicate::Never);
        }

        let children = selection
            .fields
            .into_iter()
            .map(|field| {
                Predicate::leaf(Condition::new(
                    field.clone(),
                    ConditionKind::Contains,
                    Value::String(text.to_string()),
                ))
            })
            .collect();

        Ok(Predicate::Or(children))
    }

    fn compile_comparison(
        &self,
        key: &str,
        operator: Operator,
        value: &RawValue,
        allowed: &AllowedFields,
    ) -> Result<Predicate, CompileError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CompileError::MalformedQuery(format!(
                "comparison `{operator}{value}` has no field"
            )));
        }

        let Some(field) = self.registry.resolve(key, allowed) else {
            return match self.unresolved_fields {
                UnresolvedFieldPolicy::Strict => Err(CompileError::UnresolvedField(key.to_string())),
                UnresolvedFieldPolicy::Lenient => {
                    trace!(key, "Unresolved field, matching nothing");
                    Ok(Predicate::Never)
                }
            };
        };

        let casted = self.caster.cast(field, value)?;
        trace!(
            field = %field.name,
            semantic_type = %field.semantic_type,
            operator = %operator,
            value = %casted,
            "Resolved comparison"
        );

        Ok(builder::build(field, operator, casted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{core::semantic_type::SemanticType, field::FieldDescriptor};
    use query_syntax::Comparator;
    use tracing_test::traced_test;

    fn registry() -> FieldRegistry {
        FieldRegistry::new(
            "people",
            [
                FieldDescriptor::column("name", SemanticType::String),
                FieldDescriptor::column("age", SemanticType::Integer),
                FieldDescriptor::column("active", SemanticType::Boolean),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_comparison_leaf() {
        let registry = registry();
        let compiler = QueryCompiler::new(&registry);
        let node = QueryNode::comparison("age", Operator::new(Comparator::Greater), 30_i64);

        let predicate = compiler.compile(&node, &AllowedFields::All).unwrap();
        assert_eq!(predicate.to_string(), "gt(age, 30)");
    }

    #[test]
    fn test_tree_shape_is_mirrored() {
        let registry = registry();
        let compiler = QueryCompiler::new(&registry);
        let node = QueryNode::or(
            QueryNode::not(QueryNode::comparison(
                "active",
                Operator::new(Comparator::Equal),
                true,
            )),
            QueryNode::and(
                QueryNode::term("x"),
                QueryNode::comparison("name", Operator::new(Comparator::Prefix), "J"),
            ),
        );

        let predicate = compiler
            .compile(&node, &AllowedFields::only(["name"]))
            .unwrap();
        assert_eq!(
            predicate.to_string(),
            r#"or(not(never), and(or(contains(name, "x")), starts_with(name, "J")))"#
        );
    }

    #[test]
    fn test_unresolved_policies() {
        let registry = registry();
        let node = QueryNode::comparison("email", Operator::new(Comparator::Colon), "a");

        let lenient = QueryCompiler::new(&registry);
        assert_eq!(
            lenient.compile(&node, &AllowedFields::All).unwrap(),
            Predicate::Never
        );

        let strict = QueryCompiler::new(&registry).with_policy(UnresolvedFieldPolicy::Strict);
        assert!(matches!(
            strict.compile(&node, &AllowedFields::All),
            Err(CompileError::UnresolvedField(key)) if key == "email"
        ));

        let term = QueryNode::term("a");
        assert!(matches!(
            strict.compile(&term, &AllowedFields::only(["name", "email"])),
            Err(CompileError::UnresolvedField(key)) if key == "email"
        ));
        assert_eq!(
            lenient
                .compile(&term, &AllowedFields::only(["email"]))
                .unwrap(),
            Predicate::Never
        );
    }

    #[test]
    fn test_registered_but_not_allowed_is_unresolved() {
        let registry = registry();
        let compiler = QueryCompiler::new(&registry).with_policy(UnresolvedFieldPolicy::Strict);
        let node = QueryNode::comparison("age", Operator::new(Comparator::Equal), 3_i64);

        assert!(compiler.compile(&node, &AllowedFields::only(["name"])).is_err());
    }

    #[test]
    fn test_malformed_nodes() {
        let registry = registry();
        let compiler = QueryCompiler::new(&registry);

        assert!(matches!(
            compiler.compile(&QueryNode::term("  "), &AllowedFields::All),
            Err(CompileError::MalformedQuery(_))
        ));
        assert!(matches!(
            compiler.compile(
                &QueryNode::comparison("", Operator::new(Comparator::Colon), "x"),
                &AllowedFields::All
            ),
            Err(CompileError::MalformedQuery(_))
        ));
    }

    #[test]
    fn test_blank_query_has_no_predicate() {
        let registry = registry();
        let compiler = QueryCompiler::new(&registry);
        assert_eq!(compiler.compile_str("   ", &AllowedFields::All).unwrap(), None);
    }

    #[test]
    #[traced_test]
    fn test_logs_compiled_query() {
        let registry = registry();
        let compiler = QueryCompiler::new(&registry);
        compiler
            .compile_str("age>30 dor", &AllowedFields::All)
            .unwrap();

        assert!(logs_contain("Compiled query"));
        assert!(logs_contain("Resolved comparison"));
    }
}
