use vendor_rec::ranking::run;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run()
}
