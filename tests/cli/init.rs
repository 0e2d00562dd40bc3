use anyhow::Result;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.init()?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Created .translintrc.json"));
    assert!(test.root().join(".translintrc.json").exists());

    let content = test.read_file(".translintrc.json")?;
    let parsed: serde_json::Value = serde_json::from_str(&content)?;
    assert!(parsed.get("extensions").is_some());
    assert!(parsed.get("ignores").is_some());

    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".translintrc.json", "{}")?;

    let output = test.init()?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("already exists"));

    Ok(())
}
