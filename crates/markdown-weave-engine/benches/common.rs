// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "Paragraph with **bold**, *italic* and ~~struck~~ text.\nA {gold}colored{} [link](https://example.com) on a wrapped line.\n\n- Bullet point\n  - Nested *item*\n1. Ordered item\n\n> A quote\n>> nested __deeper__\n\n---\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_unmatched_openers(size: usize) -> String {
    let mut content = String::new();
    for i in 0..size {
        content.push_str(&format!("*open {i} [link {{red}}text ~~strike\n\n"));
    }
    content
}
