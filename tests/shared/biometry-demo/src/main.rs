use shellkit_biometry as biometry;
use shellkit_bridge::Registry;

#[tokio::main]
async fn main() {
    println!("Checking biometry availability...");
    let availability = biometry::check_biometry();
    println!("Is available: {}", availability.is_available);
    println!("Biometry type: {:?}", availability.biometry_type);
    if !availability.is_available {
        println!(
            "Unavailable [{}]: {}",
            availability.code.map_or("", |code| code.as_str()),
            availability.reason
        );
    }

    println!("Requesting authentication...");
    let options = biometry::AuthOptions::new()
        .with_reason("Demo authentication from Rust")
        .allow_device_credential(true);
    match biometry::authenticate(options).await {
        Ok(()) => println!("Authentication SUCCESS!"),
        Err(err) => println!("Authentication FAILED [{}]: {err}", err.code()),
    }

    // The same operations, dispatched the way an application shell would.
    let mut registry = Registry::new();
    biometry::plugin::register(&mut registry);

    let snapshot = registry
        .invoke(biometry::plugin::CHECK_BIOMETRY, serde_json::Value::Null)
        .await;
    println!("checkBiometry via bridge: {snapshot:?}");
}
