/// Snake case form of a camel case identifier: every uppercase letter after
/// the first becomes `_` followed by its lowercase form.
///
/// ```rust
/// use sqltemplate_core::underscore_name;
/// assert_eq!(underscore_name("hireDate"), "hire_date");
/// assert_eq!(underscore_name("hire_date"), "hire_date");
/// ```
pub fn underscore_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        result.extend(first.to_lowercase());
    }
    for c in chars {
        if c.is_uppercase() {
            result.push('_');
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Key used to look up a column label or a parameter name.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
