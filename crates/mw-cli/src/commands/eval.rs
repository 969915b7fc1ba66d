use mw_engine::expression::notation;

pub fn run(expression: &str) -> Result<(), String> {
    match notation::evaluate_source(expression) {
        Ok(value) => {
            println!("{value}");
            Ok(())
        }
        Err(errors) => {
            eprint!(
                "{}",
                notation::render_errors(expression, "<expression>", &errors)
            );
            Err(format!(
                "expression rejected with {} error{}",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ))
        }
    }
}
