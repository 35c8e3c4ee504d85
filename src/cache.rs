//! Per-thread cache of compiled ast-grep patterns.
//!
//! Holds at most 256 patterns. Adding one more empties the cache first.

use ast_grep_core::Pattern;
use ast_grep_language::SupportLang;
use std::cell::RefCell;
use std::collections::HashMap;

const MAX_CACHE_ENTRIES: usize = 256;

type CacheKey = (String, String);

thread_local! {
    static PATTERN_CACHE: RefCell<HashMap<CacheKey, Pattern>> = RefCell::new(HashMap::new());
}

/// Compiled pattern for `(lang, pattern_str)`, compiling on first use.
pub fn get_or_compile_pattern(pattern_str: &str, lang: SupportLang) -> Pattern {
    let key = (format!("{lang:?}"), pattern_str.to_string());
    PATTERN_CACHE.with(|cell| {
        let mut patterns = cell.borrow_mut();
        if !patterns.contains_key(&key) && patterns.len() >= MAX_CACHE_ENTRIES {
            patterns.clear();
        }
        patterns
            .entry(key)
            .or_insert_with(|| Pattern::new(pattern_str, lang))
            .clone()
    })
}

pub fn clear_cache() {
    PATTERN_CACHE.with(|cell| cell.borrow_mut().clear());
}

/// Number of compiled patterns held by this thread.
pub fn cache_size() -> usize {
    PATTERN_CACHE.with(|cell| cell.borrow().len())
}
