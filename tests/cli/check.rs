use anyhow::Result;

use crate::CliTest;

#[test]
fn test_reports_untranslated_text() -> Result<()> {
    let test = CliTest::with_file(
        "templates/index.html",
        "<h1>{% trans 'Title' %}</h1>\n<p>Welcome to our site</p>\n",
    )?;

    let output = test.check()?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("error: \"Welcome to our site\""));
    assert!(output.stdout.contains("templates/index.html:2:4"));
    assert!(output.stdout.contains("untranslated-text"));
    assert!(output.stdout.contains("1 problems"));

    Ok(())
}

#[test]
fn test_translated_project_passes() -> Result<()> {
    let test = CliTest::with_file(
        "templates/index.html",
        "<h1>{% trans 'Title' %}</h1>\n<p>{% blocktrans %}Welcome{% endblocktrans %}</p>\n",
    )?;

    let output = test.check()?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("no untranslated text found"));

    Ok(())
}

#[test]
fn test_findings_are_sorted_across_files() -> Result<()> {
    let test = CliTest::with_file("templates/b.html", "<p>Bravo</p>")?;
    test.write_file("templates/a.html", "<p>Alpha</p>\n<p>Again</p>")?;

    let output = test.check()?;

    assert_eq!(output.code, Some(1));
    let alpha = output.stdout.find("\"Alpha\"").expect("Alpha reported");
    let again = output.stdout.find("\"Again\"").expect("Again reported");
    let bravo = output.stdout.find("\"Bravo\"").expect("Bravo reported");
    assert!(alpha < again);
    assert!(again < bravo);

    Ok(())
}

#[test]
fn test_non_template_files_are_not_scanned() -> Result<()> {
    let test = CliTest::with_file("templates/index.html", "<p>{{ greeting }}</p>")?;
    test.write_file("notes.txt", "Untranslated words everywhere")?;
    test.write_file("app.js", "var s = 'Hello';")?;

    let output = test.check()?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Checked 1 template file"));

    Ok(())
}

#[test]
fn test_config_ignores() -> Result<()> {
    let test = CliTest::new()?;

    test.write_file(
        ".translintrc.json",
        r#"{
         "ignores": ["**/generated/**"]
     }"#,
    )?;

    test.write_file("templates/index.html", "<p>{% trans 'Hi' %}</p>")?;
    test.write_file("generated/auto.html", "<p>Ignored words</p>")?;

    let output = test.check()?;

    assert_eq!(output.code, Some(0));
    assert!(!output.stdout.contains("Ignored words"));

    Ok(())
}

#[test]
fn test_config_includes() -> Result<()> {
    let test = CliTest::new()?;

    test.write_file(
        ".translintrc.json",
        r#"{
         "includes": ["templates"]
     }"#,
    )?;

    test.write_file("templates/index.html", "<p>Hello</p>")?;
    test.write_file("docs/guide.html", "<p>Not scanned</p>")?;

    let output = test.check()?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("Hello"));
    assert!(!output.stdout.contains("Not scanned"));

    Ok(())
}

#[test]
fn test_config_ignore_texts() -> Result<()> {
    let test = CliTest::new()?;

    test.write_file(
        ".translintrc.json",
        r#"{
         "ignoreTexts": ["^Lorem ipsum"]
     }"#,
    )?;

    test.write_file(
        "templates/index.html",
        "<p>Lorem ipsum dolor</p><p>Real copy</p>",
    )?;

    let output = test.check()?;

    assert_eq!(output.code, Some(1));
    assert!(!output.stdout.contains("Lorem ipsum"));
    assert!(output.stdout.contains("Real copy"));

    Ok(())
}

#[test]
fn test_config_translate_attributes() -> Result<()> {
    let test = CliTest::new()?;

    test.write_file(
        ".translintrc.json",
        r#"{
         "translateAttributes": ["i18n"]
     }"#,
    )?;

    test.write_file("templates/index.html", "<div i18n>Handled elsewhere</div>")?;

    let output = test.check()?;

    assert_eq!(output.code, Some(0));

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file("templates/index.html", "<p>{{ greeting }}</p>")?;
    test.write_file(".translintrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.check()?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("Error:"));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("--help");
    let output = cmd.output()?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("check"));
    assert!(stdout.contains("init"));

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));

    Ok(())
}
