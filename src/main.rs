use las2pcd::pcd::write_pcd_file;
use las2pcd::{ConvertOptions, Converter, LasSource};
use std::env;
use std::process::ExitCode;

const BANNER: &str = "\
===================================================================
LAS2PCD - Converts .las point clouds into PCL-friendly format .pcd
ver 0.3
===================================================================
";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("{BANNER}");

    let args: Vec<String> = env::args().skip(1).collect();
    let [in_path, out_path] = args.as_slice() else {
        eprintln!("You must enter an input path and an output path");
        return ExitCode::FAILURE;
    };

    eprintln!("INFO : Loading : {in_path}");

    match run(in_path, out_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR : {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(in_path: &str, out_path: &str) -> las2pcd::Result<()> {
    let options = ConvertOptions::from_env()?;
    log::debug!("{:?}", options);

    let mut source = LasSource::from_path(in_path)?;
    println!(
        "INFO : {} points detected in {in_path}",
        source.summary().declared_point_count
    );

    let cloud = Converter::new(options).read_cloud(&mut source)?;
    write_pcd_file(&cloud, options.data_type, out_path)?;

    eprintln!("Saved {} data points to {out_path}.", cloud.len());
    Ok(())
}
