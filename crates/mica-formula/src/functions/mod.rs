//! Function registry and the built-in function library

pub mod criteria;
pub mod helpers;
pub mod logical;
pub mod lookup;
pub mod math;
pub mod statistical;
pub mod text;

use crate::error::FormulaResult;
use crate::evaluator::FunctionContext;
use ahash::AHashMap;
use mica_core::CellValue;
use std::sync::Arc;

/// Function implementation signature
///
/// The uniform two-argument calling convention: already-evaluated argument
/// values plus the evaluator context. Implementations signal partial failure
/// by returning an in-cell error value; an `Err` is treated by the evaluator
/// as an exception-equivalent and converted to `#VALUE!`.
pub type Function =
    Arc<dyn Fn(&[CellValue], &FunctionContext<'_>) -> FormulaResult<CellValue> + Send + Sync>;

/// Case-insensitive function name space
///
/// Names are stored under their upper-case form; a parallel map preserves the
/// original case for enumeration. Registering a name twice replaces the prior
/// implementation.
pub struct FunctionRegistry {
    functions: AHashMap<String, Function>,
    original_names: AHashMap<String, String>,
}

impl FunctionRegistry {
    /// Create a registry pre-loaded with the built-in library
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }

    /// Create a registry with no functions at all
    pub fn empty() -> Self {
        Self {
            functions: AHashMap::new(),
            original_names: AHashMap::new(),
        }
    }

    /// Register a function under `name` (case-insensitive)
    pub fn register<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&[CellValue], &FunctionContext<'_>) -> FormulaResult<CellValue>
            + Send
            + Sync
            + 'static,
    {
        let key = name.to_uppercase();
        if self.functions.insert(key.clone(), Arc::new(func)).is_some() {
            log::debug!("replacing registered function '{}'", key);
        }
        self.original_names.insert(key, name.to_string());
    }

    /// Look up a function by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(&name.to_uppercase())
    }

    /// Whether a function with this name exists, case-insensitively
    pub fn has(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_uppercase())
    }

    /// Registered names in their original case, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.original_names.values().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn register_builtins(&mut self) {
        // Aggregates
        self.register("SUM", math::fn_sum);
        self.register("AVERAGE", math::fn_average);
        self.register("MIN", math::fn_min);
        self.register("MAX", math::fn_max);
        self.register("COUNT", math::fn_count);
        self.register("ABS", math::fn_abs);
        self.register("ROUND", math::fn_round);
        self.register("SUMIF", math::fn_sumif);

        self.register("COUNTA", statistical::fn_counta);
        self.register("COUNTIF", statistical::fn_countif);

        // Logical and comparison
        self.register("IF", logical::fn_if);
        self.register("AND", logical::fn_and);
        self.register("OR", logical::fn_or);
        self.register("NOT", logical::fn_not);
        self.register("IFERROR", logical::fn_iferror);
        self.register("EQ", logical::fn_eq);
        self.register("NE", logical::fn_ne);
        self.register("GT", logical::fn_gt);
        self.register("GTE", logical::fn_gte);
        self.register("LT", logical::fn_lt);
        self.register("LTE", logical::fn_lte);

        // Text
        self.register("CONCAT", text::fn_concat);
        self.register("LEN", text::fn_len);
        self.register("UPPER", text::fn_upper);
        self.register("LOWER", text::fn_lower);
        self.register("TRIM", text::fn_trim);

        // Lookup
        self.register("MATCH", lookup::fn_match);
        self.register("INDEX", lookup::fn_index);
        self.register("VLOOKUP", lookup::fn_vlookup);
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let registry = FunctionRegistry::new();
        assert!(registry.has("SUM"));
        assert!(registry.has("sum"));
        assert!(registry.has("Sum"));
        assert!(registry.get("vlookup").is_some());
        assert!(!registry.has("NOPE"));

        // Case variants resolve to the same implementation
        let a = registry.get("SUM").unwrap();
        let b = registry.get("sum").unwrap();
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_names_preserve_original_case() {
        let mut registry = FunctionRegistry::empty();
        registry.register("MyFunc", |_args, _ctx| Ok(CellValue::Empty));
        assert!(registry.has("MYFUNC"));
        assert!(registry.has("myfunc"));
        assert_eq!(registry.names(), ["MyFunc"]);
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = FunctionRegistry::empty();
        registry.register("Twice", |_args, _ctx| Ok(CellValue::Number(1.0)));
        registry.register("TWICE", |_args, _ctx| Ok(CellValue::Number(2.0)));

        // One entry only, with the latest original-case name
        assert_eq!(registry.names(), ["TWICE"]);

        let func = registry.get("twice").unwrap();
        let workbook = mica_core::Workbook::new();
        let inner = FunctionRegistry::empty();
        let ctx = FunctionContext {
            workbook: &workbook,
            sheet: "S",
            registry: &inner,
        };
        assert_eq!(func.as_ref()(&[], &ctx).unwrap(), CellValue::Number(2.0));
    }

    #[test]
    fn test_builtin_roster() {
        let registry = FunctionRegistry::new();
        for name in [
            "SUM", "AVERAGE", "MIN", "MAX", "COUNT", "COUNTA", "IF", "AND", "OR", "NOT", "EQ",
            "NE", "GT", "GTE", "LT", "LTE", "CONCAT", "LEN", "UPPER", "LOWER", "COUNTIF",
            "SUMIF", "MATCH", "INDEX", "VLOOKUP",
        ] {
            assert!(registry.has(name), "missing builtin {}", name);
        }
    }
}
