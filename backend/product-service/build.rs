fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["../proto/services/product_service.proto"],
            &["../proto/services"],
        )?;
    println!("cargo:rerun-if-changed=../proto/services/product_service.proto");
    Ok(())
}
