use crate::{
    cast::date::{DateResolver, PhraseResolver},
    compiler::{CompileOptions, QueryCompiler},
    error::{CompileError, SearchError},
    filter::{compiler::FilterCompiler, memory::MemoryFilterCompiler, sql::SqlFilterCompiler},
    predicate::Predicate,
};
use connectors::{adapter::Adapter, memory::MemoryStore, sql::table::SqlTable};
use model::{
    config::{CastingPolicy, UnresolvedFieldPolicy},
    field::{
        allowed::AllowedFields,
        registry::{FieldRegistry, RegistryHandle},
    },
};
use std::sync::Arc;
use tracing::debug;

/// An adapter paired with the compiler that lowers predicates into its
/// filter type.
pub trait SearchTarget: Adapter {
    type Compiler: FilterCompiler<Filter = Self::Filter>;
}

impl SearchTarget for MemoryStore {
    type Compiler = MemoryFilterCompiler;
}

impl SearchTarget for SqlTable {
    type Compiler = SqlFilterCompiler;
}

/// Compile-and-filter over one entity's registry.
///
/// The registry sits behind a [`RegistryHandle`]; each call takes one
/// snapshot and uses it throughout.
#[derive(Debug, Clone)]
pub struct Search<R = PhraseResolver> {
    registry: Arc<RegistryHandle>,
    options: CompileOptions,
    resolver: R,
}

impl Search {
    pub fn new(registry: FieldRegistry) -> Self {
        Search::shared(Arc::new(RegistryHandle::new(registry)))
    }

    pub fn shared(registry: Arc<RegistryHandle>) -> Self {
        Search {
            registry,
            options: CompileOptions::default(),
            resolver: PhraseResolver::default(),
        }
    }
}

impl<R: DateResolver> Search<R> {
    pub fn with_policy(mut self, policy: UnresolvedFieldPolicy) -> Self {
        self.options.unresolved_fields = policy;
        self
    }

    pub fn with_casting(mut self, casting: CastingPolicy) -> Self {
        self.options.casting = casting;
        self
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolver<S: DateResolver>(self, resolver: S) -> Search<S> {
        Search {
            registry: self.registry,
            options: self.options,
            resolver,
        }
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    /// Compiles `query` against the current registry without running it.
    pub fn compile(
        &self,
        query: &str,
        allowed: &AllowedFields,
    ) -> Result<Option<Predicate>, CompileError> {
        let registry = self.registry.snapshot();
        QueryCompiler::new(&registry)
            .with_options(self.options)
            .with_resolver(&self.resolver)
            .compile_str(query, allowed)
    }

    /// Compiles `query`, lowers it for `target` and fetches the matches.
    /// A blank query fetches everything.
    pub fn run<T: SearchTarget>(
        &self,
        target: &T,
        query: &str,
        allowed: &AllowedFields,
    ) -> Result<T::Output, SearchError> {
        let filter = match self.compile(query, allowed)? {
            Some(predicate) => T::Compiler::compile(&predicate),
            None => T::Compiler::unfiltered(),
        };

        let output = target.fetch(&filter)?;
        debug!(query, "Search complete");
        Ok(output)
    }
}
