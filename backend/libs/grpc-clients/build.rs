fn main() {
    // Client stubs for services other crates call into. Servers generate
    // their own server code from the same files.
    let services = vec![("user_service", "../../proto/services/user_service.proto")];

    for (service_name, proto_path) in services {
        tonic_build::configure()
            .build_server(false)
            .build_client(true)
            .compile(&[proto_path], &["../../proto/services/"])
            .unwrap_or_else(|e| panic!("Failed to compile {}: {}", service_name, e));
    }

    println!("cargo:rerun-if-changed=../../proto/services/");
}
