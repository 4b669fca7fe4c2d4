//! Template Node Loader + Helper Loader integration tests against real files.

use std::fs;
use std::path::Path;

use mipha_renderer::{to_tera_context, HelperLibrary, RenderError, TemplateCollection};
use rstest::rstest;
use tempfile::TempDir;

const HELPER: &str = "\
{% macro greet(name) %}Hello, {{ name }}!{% endmacro greet %}
{% macro list(items) %}{% for i in items %}- {{ i }}
{% endfor %}{% endmacro list %}
";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).expect("mkdir");
    fs::write(path, content).expect("write fixture");
}

fn vars(yaml: &str) -> tera::Context {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).expect("yaml");
    to_tera_context(&value).expect("context")
}

#[test]
fn helper_file_on_disk_is_shared_by_all_units() {
    let tmp = TempDir::new().unwrap();
    let templates = tmp.path().join("templates");
    write(&templates, "a.txt", "{{ helpers::greet(name=Name) }}");
    write(&templates, "nested/b.txt", "{{ helpers::list(items=Items) }}");
    let helper = tmp.path().join("helper.tpl");
    fs::write(&helper, HELPER).unwrap();

    let tc = TemplateCollection::load_with_helper(&templates, Some(&helper)).expect("load");
    assert_eq!(tc.len(), 2);
    let names: Vec<&str> = tc.helpers().iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["greet", "list"]);

    let ctx = vars("Name: World\nItems: [x, y]\n");
    assert_eq!(tc.units()[0].render(&ctx).unwrap(), "Hello, World!");
    assert_eq!(tc.units()[1].render(&ctx).unwrap(), "- x\n- y\n");
}

#[test]
fn helper_parsed_once_even_with_many_units() {
    let tmp = TempDir::new().unwrap();
    for i in 0..20 {
        write(tmp.path(), &format!("t{i:02}.txt"), "{{ helpers::greet(name=Name) }}");
    }
    let lib = HelperLibrary::parse(Path::new("helper.tpl"), HELPER).unwrap();
    let tc = TemplateCollection::load(tmp.path(), &lib).unwrap();
    let ctx = vars("Name: Go\n");
    for unit in tc.iter() {
        assert_eq!(unit.render(&ctx).unwrap(), "Hello, Go!");
    }
}

#[test]
fn template_without_helper_calls_loads_without_helper_file() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "plain.txt", "Hello {{ Name }}");

    let tc = TemplateCollection::load_with_helper(tmp.path(), None).unwrap();
    assert!(tc.helpers().is_empty());
    assert_eq!(tc.units()[0].render(&vars("Name: World\n")).unwrap(), "Hello World");
}

#[rstest]
#[case("{{ helpers::greet(name=Name) }}")]
#[case("{% set x = helpers::greet(name=Name) %}{{ x }}")]
#[case("{% if Name %}{{ helpers::greet(name=Name) }}{% endif %}")]
#[case("{% if helpers::greet(name=Name) and true %}y{% endif %}")]
#[case("{% if Name %}a{% elif helpers::greet(name=Name) == \"x\" %}b{% endif %}")]
#[case("{{ Name | default(value=helpers::greet(name=Name)) }}")]
#[case("{{ get_env(name=\"MIPHA_UNSET\", default=helpers::greet(name=Name)) }}")]
#[case("{{ 1 + get_env(name=\"MIPHA_UNSET\", default=helpers::greet(name=Name)) }}")]
#[case("{{ \"a\" ~ get_env(name=\"MIPHA_UNSET\", default=helpers::greet(name=Name)) }}")]
#[case("{% if Name is containing(helpers::greet(name=Name)) %}y{% endif %}")]
#[case("{% if helpers::greet(name=Name) in Items %}y{% endif %}")]
#[case("{% set xs = [Name, helpers::greet(name=Name)] %}{{ xs | length }}")]
#[case("{% for c in helpers::greet(name=Name) %}{{ c }}{% endfor %}")]
#[case("{% for c in Items %}{{ c }}{% else %}{{ helpers::greet(name=Name) }}{% endfor %}")]
#[case("{% filter default(value=helpers::greet(name=Name)) %}x{% endfilter %}")]
fn helper_calls_fail_to_load_when_helper_omitted(#[case] body: &str) {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.txt", body);

    let err = TemplateCollection::load_with_helper(tmp.path(), None).unwrap_err();
    assert!(matches!(err, RenderError::UnknownNamespace { .. }), "got: {err}");
    assert!(err.to_string().contains("helpers::greet"));
}

#[test]
fn malformed_helper_aborts_before_templates_load() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "templates/a.txt", "{{ Name }}");
    let helper = tmp.path().join("helper.tpl");
    fs::write(&helper, "{% macro broken(a %}x{% endmacro %}").unwrap();

    let err = TemplateCollection::load_with_helper(&tmp.path().join("templates"), Some(&helper))
        .unwrap_err();
    assert!(matches!(err, RenderError::Helper { .. }), "got: {err}");
}

#[cfg(unix)]
#[test]
fn symlinked_files_are_loaded_and_symlinked_dirs_skipped() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().unwrap();
    let outside = tmp.path().join("outside");
    write(&outside, "shared.txt", "shared {{ Name }}");
    let templates = tmp.path().join("templates");
    write(&templates, "own.txt", "own");
    symlink(outside.join("shared.txt"), templates.join("link.txt")).unwrap();
    symlink(&outside, templates.join("linked_dir")).unwrap();

    let tc = TemplateCollection::load(&templates, &HelperLibrary::empty()).unwrap();
    let names: Vec<String> = tc
        .iter()
        .map(|u| u.relative_path().display().to_string())
        .collect();
    assert_eq!(names, ["link.txt", "own.txt"]);
}
