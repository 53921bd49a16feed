#![forbid(unsafe_code)]

// `embed_migrations!` does not track the files it reads.
fn main() {
    println!("cargo:rerun-if-changed=src/migrations");
}
