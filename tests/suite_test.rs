use pretty_assertions::assert_eq;
use schema_engine::{validate, Schema, SerdeSchema};
use serde::Deserialize;
use serde_json::Value;
use std::fs;

#[derive(Deserialize)]
struct TestSuite {
    name: String,
    schema: SerdeSchema,
    instances: Vec<TestCase>,
}

#[derive(Deserialize)]
struct TestCase {
    instance: Value,
    errors: Vec<String>,
}

#[test]
fn suite() -> Result<(), failure::Error> {
    let mut test_files: Vec<_> = fs::read_dir("tests/suite")?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()?;
    test_files.sort();
    assert!(!test_files.is_empty());

    for path in test_files {
        println!("{:?}", &path);
        let file = fs::read(&path)?;
        let suites: Vec<TestSuite> = serde_json::from_slice(&file)?;

        for suite in suites {
            println!("{}", suite.name);
            let schema = Schema::from_serde(suite.schema)?;

            for (i, test_case) in suite.instances.into_iter().enumerate() {
                println!("{}/{}", suite.name, i);
                let result = validate(&schema, &test_case.instance);
                let actual: Vec<String> = result.errors().iter().map(|e| e.to_string()).collect();

                assert_eq!(test_case.errors, actual);
                assert_eq!(test_case.errors.is_empty(), result.is_ok());
            }
        }
    }

    Ok(())
}
