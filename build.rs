// The custom build script, needed as we use protocolbuffers.

fn main() -> Result<(), anyhow::Error> {
    println!("cargo:rerun-if-changed=src/proto/varquery/v1/variant_db.proto");
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }
    tonic_build::configure()
        .build_client(true)
        // The server stub backs the in-process transport tests.
        .build_server(true)
        .compile(&["varquery/v1/variant_db.proto"], &["src/proto"])?;
    Ok(())
}
