use next_options::{Format, Locator, OptionKind, OptionSpec, Override, Registry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let config_path = temp_dir.path().join("app.yaml");

    // Declare the options the application understands
    let mut registry = Registry::new();
    registry.register(OptionSpec::new("app", "name", "MyApp", OptionKind::String, "display name"))?;
    registry.register(OptionSpec::new("net", "port", 8080, OptionKind::Int, "listen port"))?;
    registry.register(
        OptionSpec::builder()
            .key("log")
            .subkey("level")
            .default_value("info")
            .kind(OptionKind::Text)
            .description("verbosity")
            .alternatives(["debug", "info", "warn"])
            .build()?,
    )?;
    registry.freeze();

    println!("{}", registry.document(None));

    // Overlay a user file if one can be found
    let locator = Locator::new()?;
    if let Some(path) = registry.load_located(&locator, ".myapp.yaml")? {
        println!("Loaded {}", path.display());
    }

    registry.set("net", "port", 9090)?;
    registry.lock("net", "port")?;

    match registry.set("net", "port", 80) {
        Ok(()) => println!("Port changed"),
        Err(e) => println!("Set failed (expected): {}", e),
    }

    registry.with_overrides(vec![Override::new("log", "level", "debug")], |registry| {
        println!("Inside override: log.level = {}", registry.get("log", "level")?);
        Ok(())
    })?;
    println!("After override: log.level = {}", registry.get("log", "level")?);

    registry.write_to_file(&config_path, Format::Yaml)?;
    println!("{}", std::fs::read_to_string(&config_path)?);

    Ok(())
}
