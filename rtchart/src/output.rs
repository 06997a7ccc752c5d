use rtchart_core::{display_name, LatestValues};
use sampling::SeriesId;

pub fn print_info(message: &str) {
    println!("[RTChart][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[RTChart][ERROR]: {message}");
}

pub fn print_values(values: &LatestValues) {
    println!(
        "{}: {}\t{}: {}\t{}: {}",
        display_name(SeriesId::A),
        values.a,
        display_name(SeriesId::B),
        values.b,
        display_name(SeriesId::C),
        values.c
    );
}
