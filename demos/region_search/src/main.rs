use spyglass::{CommandSource, Result, World, dispatch};
use std::{env::args, fs::File};

// region_search <region_file> <x> <y> <z> <command...>
//
// e.g. region_search r.0.0.mca 120 64 -80 fr diamond chest 50
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = args().collect::<Vec<String>>();
    let region = args.get(1).expect("No region file given");
    let x = args.get(2).expect("No x given").parse::<i32>().unwrap();
    let y = args.get(3).expect("No y given").parse::<i32>().unwrap();
    let z = args.get(4).expect("No z given").parse::<i32>().unwrap();
    let command = args[5..].join(" ");

    // we expect the region file to follow this format "r.x.z.mca"
    let region_coordinates = region.split('.').collect::<Vec<&str>>();
    let region_x = region_coordinates.get(1).unwrap().parse::<i32>().unwrap();
    let region_z = region_coordinates.get(2).unwrap().parse::<i32>().unwrap();

    let mut world = World::empty();
    let loaded = world.load_region(&mut File::open(region)?, (region_x, region_z))?;
    println!("{loaded} chunks loaded from {region}");

    let mut source = CommandSource::player("demo", (x, y, z));
    let result = dispatch(&mut world, &mut source, &command);

    for message in source.sent() {
        println!("{}", message.to_plain());
    }
    println!(
        "result: {result}, markers spawned: {}",
        world.markers().len()
    );

    Ok(())
}
