use entities::ENTITIES;
use std::io::Write;
use std::{env, path::PathBuf};

fn main() {
    let out_dir: PathBuf = env::var("OUT_DIR").unwrap().parse().unwrap();

    // The inline scanner looks entities up by their name with the trailing
    // ";" still attached, like "amp;" for "&amp;". entities::ENTITIES carries
    // many names both with and without the ";"; only the terminated ones are
    // legal here.
    let mut map = phf_codegen::Map::new();
    let mut count = 0;
    for e in ENTITIES
        .iter()
        .filter(|e| e.entity.starts_with('&') && e.entity.ends_with(';'))
    {
        let codepoints = e
            .characters
            .chars()
            .map(|c| format!("0x{:X}", c as u32))
            .collect::<Vec<_>>()
            .join(", ");
        map.entry(&e.entity[1..], &format!("&[{}]", codepoints));
        count += 1;
    }

    let out = std::fs::File::create(out_dir.join("entitydata.rs")).unwrap();
    let mut bw = std::io::BufWriter::new(out);
    writeln!(bw, "pub(crate) const ENTITY_COUNT: usize = {};", count).unwrap();
    writeln!(
        bw,
        "pub(crate) static ENTITIES: phf::Map<&'static str, &'static [u32]> = {};",
        map.build()
    )
    .unwrap();
}
