use std::env;
use std::process;

use dishwish::{GenerationRequest, ProviderKind, RecipeGenerator};

const USAGE: &str = "Usage: dishwish <comma,separated,ingredients> [options]

Options:
  --diet <restriction>     dietary restriction, repeatable
  --cuisine <cuisine>      preferred cuisine
  --skill <level>          cooking skill level
  --meal <type>            meal type, e.g. dinner
  --request <text>         free-text extra requests
  --provider <name>        openai | anthropic | ollama
  --raw                    always print the raw model reply on stderr

Pass \"\" as the ingredient list to let the model suggest freely.";

struct CliArgs {
    request: GenerationRequest,
    provider: Option<ProviderKind>,
    show_raw: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut iter = args.iter();
    let ingredients = iter
        .next()
        .ok_or("missing ingredient list")?
        .split(',')
        .map(str::to_string)
        .collect();

    let mut diets = Vec::new();
    let mut cuisine = None;
    let mut skill = None;
    let mut meal = None;
    let mut requests = None;
    let mut provider = None;
    let mut show_raw = false;

    while let Some(flag) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or(format!("{} requires a value", name))
        };
        match flag.as_str() {
            "--diet" => diets.push(value("--diet")?),
            "--cuisine" => cuisine = Some(value("--cuisine")?),
            "--skill" => skill = Some(value("--skill")?),
            "--meal" => meal = Some(value("--meal")?),
            "--request" => requests = Some(value("--request")?),
            "--provider" => {
                provider = Some(match value("--provider")?.as_str() {
                    "openai" => ProviderKind::OpenAi,
                    "anthropic" => ProviderKind::Anthropic,
                    "ollama" => ProviderKind::Ollama,
                    other => return Err(format!("unknown provider: {}", other)),
                })
            }
            "--raw" => show_raw = true,
            other => return Err(format!("unknown option: {}", other)),
        }
    }

    Ok(CliArgs {
        request: GenerationRequest::new(ingredients, diets, cuisine, skill, meal, requests),
        provider,
        show_raw,
    })
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            process::exit(2);
        }
    };

    let mut builder = RecipeGenerator::builder().ingredients(cli.request.ingredients.clone());
    for diet in &cli.request.dietary_restrictions {
        builder = builder.dietary_restriction(diet);
    }
    if let Some(cuisine) = &cli.request.cuisine {
        builder = builder.cuisine(cuisine);
    }
    if let Some(skill) = &cli.request.skill_level {
        builder = builder.skill_level(skill);
    }
    if let Some(meal) = &cli.request.meal_type {
        builder = builder.meal_type(meal);
    }
    if let Some(requests) = &cli.request.specific_requests {
        builder = builder.specific_requests(requests);
    }
    if let Some(provider) = cli.provider {
        builder = builder.provider(provider);
    }

    match builder.generate().await {
        Ok(generated) => {
            match serde_json::to_string_pretty(&generated.recipe) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Failed to serialize recipe: {}", e);
                    process::exit(1);
                }
            }
            if cli.show_raw || generated.is_sparse() {
                if generated.is_sparse() {
                    log::warn!("structured extraction looks unreliable; showing raw reply");
                }
                eprintln!("--- raw model reply ---\n{}", generated.raw_output);
            }
        }
        Err(e) => {
            eprintln!("Recipe generation failed: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_full() {
        let cli = parse_args(&args(&[
            "chicken, rice",
            "--diet",
            "vegan",
            "--diet",
            "nut-free",
            "--cuisine",
            "Thai",
            "--meal",
            "dinner",
            "--raw",
        ]))
        .unwrap();

        assert_eq!(cli.request.ingredients, vec!["chicken", "rice"]);
        assert_eq!(cli.request.dietary_restrictions, vec!["vegan", "nut-free"]);
        assert_eq!(cli.request.cuisine.as_deref(), Some("Thai"));
        assert_eq!(cli.request.meal_type.as_deref(), Some("dinner"));
        assert!(cli.show_raw);
    }

    #[test]
    fn test_parse_args_empty_ingredients() {
        let cli = parse_args(&args(&[""])).unwrap();
        assert!(cli.request.ingredients.is_empty());
    }

    #[test]
    fn test_parse_args_rejects_unknown_flags() {
        assert!(parse_args(&args(&["eggs", "--bogus"])).is_err());
        assert!(parse_args(&args(&["eggs", "--cuisine"])).is_err());
        assert!(parse_args(&args(&[])).is_err());
    }
}
