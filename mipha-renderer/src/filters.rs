//! Case-conversion filters added on top of Tera's built-ins.

use std::collections::HashMap;

use heck::{
    ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase, ToTitleCase,
};
use tera::{Result, Tera, Value};

/// Register every extra filter on `tera`.
pub(crate) fn register(tera: &mut Tera) {
    tera.register_filter("snake_case", snake_case);
    tera.register_filter("pascal_case", pascal_case);
    tera.register_filter("camel_case", camel_case);
    tera.register_filter("kebab_case", kebab_case);
    tera.register_filter("shouty_snake_case", shouty_snake_case);
    tera.register_filter("title_case", title_case);
}

fn as_str<'a>(value: &'a Value, filter: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} filter expects a string")))
}

pub(crate) fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(as_str(value, "snake_case")?.to_snake_case()))
}

pub(crate) fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(as_str(value, "pascal_case")?.to_pascal_case()))
}

pub(crate) fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(as_str(value, "camel_case")?.to_lower_camel_case()))
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(as_str(value, "kebab_case")?.to_kebab_case()))
}

pub(crate) fn shouty_snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(
        as_str(value, "shouty_snake_case")?.to_shouty_snake_case(),
    ))
}

pub(crate) fn title_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(as_str(value, "title_case")?.to_title_case()))
}
