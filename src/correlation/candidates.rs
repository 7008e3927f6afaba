//! Name guessing from test identifiers to implementation identifiers.
//!
//! Both generators are pure and return an ordered list without duplicates or
//! empty entries. The order is the lookup priority.

/// Method-name suffixes that name a test scenario rather than the method.
const SCENARIO_SUFFIXES: [&str; 4] = ["Invalid", "Valid", "Test", "Case"];

fn push_unique(candidates: &mut Vec<String>, candidate: String) {
    if !candidate.is_empty() && !candidates.contains(&candidate) {
        candidates.push(candidate);
    }
}

/// Last `.`-separated segment of a qualified name.
pub fn last_segment(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn split_qualified(qualified: &str) -> (&str, &str) {
    match qualified.rfind('.') {
        Some(idx) => (&qualified[..idx], &qualified[idx + 1..]),
        None => ("", qualified),
    }
}

fn join_qualified(package: &str, simple: &str) -> String {
    if simple.is_empty() {
        String::new()
    } else if package.is_empty() {
        simple.to_string()
    } else {
        format!("{package}.{simple}")
    }
}

fn strip_trailing_test(simple: &str) -> &str {
    simple
        .strip_suffix("Tests")
        .or_else(|| simple.strip_suffix("Test"))
        .unwrap_or(simple)
}

/// Rewrite a `.test.` package segment to the production convention.
fn production_package(qualified: &str) -> String {
    if let Some(rest) = qualified.strip_prefix("test.") {
        return rest.replace(".test.", ".");
    }
    qualified.replace(".test.", ".")
}

/// Implementation class candidates for a test class, most specific first.
///
/// For `com.example.test.HelloServiceTest`:
/// 1. `com.example.test.HelloServiceTest`
/// 2. `com.example.test.HelloService` (trailing `Test`/`Tests` removed)
/// 3. the same with every `Test` removed from the simple name
/// 4. each of the above with `.test.` rewritten, e.g. `com.example.HelloService`
pub fn class_candidates(qualified_class: &str) -> Vec<String> {
    let (package, simple) = split_qualified(qualified_class);
    let mut base = Vec::new();
    push_unique(&mut base, join_qualified(package, simple));
    push_unique(&mut base, join_qualified(package, strip_trailing_test(simple)));
    push_unique(&mut base, join_qualified(package, &simple.replace("Test", "")));

    let mut candidates = base.clone();
    for candidate in &base {
        push_unique(&mut candidates, production_package(candidate));
    }
    candidates
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `testHelloWorld` becomes `helloWorld`; names without the prefix are unchanged.
fn strip_test_prefix(method: &str) -> String {
    match method
        .strip_prefix("test")
        .map(|rest| rest.trim_start_matches('_'))
    {
        Some(rest) if !rest.is_empty() => lower_first(rest),
        _ => method.to_string(),
    }
}

/// Cut at the first uppercase letter after position 0: `helloWorld` → `hello`.
fn camel_head(name: &str) -> &str {
    name.char_indices()
        .skip(1)
        .find(|(_, c)| c.is_uppercase())
        .map(|(idx, _)| &name[..idx])
        .unwrap_or(name)
}

/// Cut at the first underscore after position 0: `hello_returnsGreeting` → `hello`.
fn underscore_head(name: &str) -> &str {
    name.char_indices()
        .skip(1)
        .find(|(_, c)| *c == '_')
        .map(|(idx, _)| &name[..idx])
        .unwrap_or(name)
}

fn strip_scenario_suffixes(name: &str) -> &str {
    let mut current = name;
    loop {
        let next = SCENARIO_SUFFIXES
            .iter()
            .find_map(|suffix| current.strip_suffix(suffix).filter(|rest| !rest.is_empty()));
        match next {
            Some(rest) => current = rest,
            None => return current,
        }
    }
}

/// Implementation method candidates for a test method, most specific first.
///
/// For `testValidateInputInvalid`:
/// 1. `testValidateInputInvalid` (unchanged)
/// 2. `validateInputInvalid` (`test` prefix stripped)
/// 3. `validate` (camel-case head)
/// 4. underscore head of 2 (same here, so dropped)
/// 5. `validateInput` (scenario suffixes stripped)
/// 6. `testvalidateinputinvalid` (lower-cased)
pub fn method_candidates(method: &str) -> Vec<String> {
    let stripped = strip_test_prefix(method);
    let mut candidates = Vec::new();
    push_unique(&mut candidates, method.to_string());
    push_unique(&mut candidates, stripped.clone());
    push_unique(&mut candidates, camel_head(&stripped).to_string());
    push_unique(&mut candidates, underscore_head(&stripped).to_string());
    push_unique(&mut candidates, strip_scenario_suffixes(&stripped).to_string());
    push_unique(&mut candidates, method.to_lowercase());
    candidates
}
