//! CLI for the tweet sentiment pipeline
//!
//! ```bash
//! cargo run -- --help
//! cargo run -- train --data tweets.csv --output model.json
//! cargo run -- evaluate --data tweets.csv --grid
//! cargo run -- classify --model model.json --text "what a great day"
//! cargo run -- stream --model model.json --replay tweets.csv --output live.csv
//! ```

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::broadcast;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use tweet_sentiment::{
    data::{label_vector, DataLoader, LabeledTweet, Sentiment},
    ensemble::VotingEnsemble,
    ml::{cross_validate, default_grid, CrossValidator, GridSearch, Metrics},
    models::Classifier,
    nlp::{Preprocessor, TfIdf, Tokenizer, Vectorizer},
    store::ModelBundle,
    stream::{StreamMonitor, StreamSimulator, TweetStreamClient},
};

#[derive(Parser)]
#[command(name = "tweet_sentiment")]
#[command(version = "0.1.0")]
#[command(about = "Twitter sentiment classification with a voting ensemble", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the ensemble on a labeled dataset and save the bundle
    Train {
        /// CSV dataset of (id, label, text) rows
        #[arg(short, long)]
        data: PathBuf,

        /// Where to save the fitted bundle
        #[arg(short, long, default_value = "model.json")]
        output: PathBuf,

        /// Fraction of rows held out for the test report
        #[arg(short, long, default_value = "0.2")]
        test_ratio: f64,

        /// Minimum document frequency for the vocabulary
        #[arg(long, default_value = "2")]
        min_df: usize,
    },

    /// Cross-validate the classifiers, optionally with a grid search
    Evaluate {
        /// CSV dataset of (id, label, text) rows
        #[arg(short, long)]
        data: PathBuf,

        /// Number of cross-validation folds
        #[arg(short, long, default_value = "5")]
        folds: usize,

        /// Run the hyperparameter grid search
        #[arg(short, long)]
        grid: bool,

        /// Minimum document frequency for the vocabulary
        #[arg(long, default_value = "2")]
        min_df: usize,
    },

    /// Classify one text with a saved bundle
    Classify {
        /// Path to a saved bundle
        #[arg(short, long, default_value = "model.json")]
        model: PathBuf,

        /// Text to classify
        #[arg(short, long)]
        text: String,
    },

    /// Classify a tweet stream with a saved bundle
    Stream {
        /// Path to a saved bundle
        #[arg(short, long, default_value = "model.json")]
        model: PathBuf,

        /// WebSocket feed URL
        #[arg(short, long)]
        url: Option<String>,

        /// Replay a saved CSV dataset instead of connecting
        #[arg(short, long)]
        replay: Option<PathBuf>,

        /// File receiving one label,confidence line per tweet
        #[arg(short, long, default_value = "stream_output.csv")]
        output: PathBuf,

        /// Stop after this many tweets
        #[arg(long)]
        limit: Option<usize>,
    },

    /// End-to-end demonstration on a small built-in corpus
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train {
            data,
            output,
            test_ratio,
            min_df,
        } => {
            run_train(&data, &output, test_ratio, min_df)?;
        }
        Commands::Evaluate {
            data,
            folds,
            grid,
            min_df,
        } => {
            run_evaluate(&data, folds, grid, min_df)?;
        }
        Commands::Classify { model, text } => {
            run_classify(&model, &text)?;
        }
        Commands::Stream {
            model,
            url,
            replay,
            output,
            limit,
        } => {
            run_stream(&model, url, replay, &output, limit).await?;
        }
        Commands::Demo => {
            run_demo()?;
        }
    }

    Ok(())
}

/// Tokenize, preprocess and vectorize a dataset into a fitted pipeline.
fn build_features(
    tweets: &[LabeledTweet],
    min_df: usize,
) -> (Tokenizer, Preprocessor, TfIdf, ndarray::Array2<f64>) {
    let tokenizer = Tokenizer::new();
    let preprocessor = Preprocessor::new();

    let documents: Vec<Vec<String>> = tweets
        .iter()
        .map(|t| preprocessor.apply(&tokenizer.tokenize_to_strings(&t.text)))
        .collect();

    let mut vectorizer = TfIdf::new().with_min_df(min_df);
    let dtm = vectorizer.fit_transform(&documents);

    info!(
        documents = dtm.n_documents(),
        vocabulary = dtm.n_terms(),
        "vectorized dataset"
    );

    let x = dtm.to_array();
    (tokenizer, preprocessor, vectorizer, x)
}

fn run_train(data: &PathBuf, output: &PathBuf, test_ratio: f64, min_df: usize) -> Result<()> {
    println!("\n📊 Loading dataset from {:?}...\n", data);

    let tweets = DataLoader::load_csv(data)?;
    let (positive, negative) = DataLoader::label_counts(&tweets);
    println!(
        "Loaded {} tweets ({} positive, {} negative)",
        tweets.len(),
        positive,
        negative
    );

    let (train, test) = DataLoader::train_test_split(&tweets, test_ratio)?;
    info!(train = train.len(), test = test.len(), "split dataset");

    let (tokenizer, preprocessor, vectorizer, x_train) = build_features(&train, min_df);
    let y_train = label_vector(&train);

    println!("\n🎯 Training ensemble members...\n");
    let mut ensemble = VotingEnsemble::with_default_members();
    ensemble.fit(&x_train, &y_train)?;

    // Held-out evaluation through the full pipeline
    let bundle = ModelBundle::new(tokenizer, preprocessor, vectorizer, ensemble);

    let test_texts: Vec<String> = test.iter().map(|t| t.text.clone()).collect();
    let x_test = bundle.feature_matrix(&test_texts);
    let y_test = label_vector(&test);

    for member in bundle.ensemble.members() {
        let predictions = member.predict(&x_test)?;
        println!(
            "  {:20} accuracy: {:.4}",
            member.name(),
            Metrics::accuracy(&y_test, &predictions)
        );
    }

    let ensemble_predictions = bundle.ensemble.predict(&x_test)?;
    println!(
        "  {:20} accuracy: {:.4}\n",
        "ensemble",
        Metrics::accuracy(&y_test, &ensemble_predictions)
    );
    println!("{}", Metrics::classification_report(&y_test, &ensemble_predictions));

    bundle.save(output)?;
    println!("\n✅ Saved bundle to {:?}", output);

    Ok(())
}

fn run_evaluate(data: &PathBuf, folds: usize, grid: bool, min_df: usize) -> Result<()> {
    println!("\n📊 Loading dataset from {:?}...\n", data);

    let tweets = DataLoader::load_csv(data)?;
    if tweets.is_empty() {
        bail!("Dataset is empty after filtering to binary labels");
    }

    let (_, _, _, x) = build_features(&tweets, min_df);
    let y = label_vector(&tweets);

    println!("🎯 {}-fold cross-validation\n", folds);
    let splits = CrossValidator::stratified_k_fold(&y, folds);

    for member in VotingEnsemble::with_default_members().members() {
        let scores = cross_validate(member, &x, &y, &splits)?;
        println!(
            "  {:20} accuracy: {:.4} (+/- {:.4})",
            member.name(),
            scores.mean(),
            scores.std()
        );
    }

    if grid {
        println!("\n🔍 Grid search over {} candidates\n", default_grid().len());

        let report = GridSearch::new(folds).search(&default_grid(), &x, &y)?;
        for (i, score) in report.scores.iter().enumerate() {
            let marker = if i == report.best_index { "→" } else { " " };
            println!(
                "{} {:20} {:30} accuracy: {:.4} (+/- {:.4})",
                marker, score.name, score.params, score.mean_accuracy, score.std_accuracy
            );
        }

        let best = report.best();
        println!(
            "\nBest: {} ({}) with accuracy {:.4}",
            best.name, best.params, best.mean_accuracy
        );
    }

    Ok(())
}

fn run_classify(model: &PathBuf, text: &str) -> Result<()> {
    let bundle = ModelBundle::load(model)?;
    let vote = bundle.classify(text)?;

    println!("\n📝 {}", text);
    println!("Label:      {}", vote.label);
    println!("Confidence: {:.1}%", vote.confidence * 100.0);

    Ok(())
}

async fn run_stream(
    model: &PathBuf,
    url: Option<String>,
    replay: Option<PathBuf>,
    output: &PathBuf,
    limit: Option<usize>,
) -> Result<()> {
    let bundle = ModelBundle::load(model)?;
    let mut monitor = StreamMonitor::new(bundle, output)?;

    let summary = match (url, replay) {
        (Some(url), None) => {
            println!("\n📡 Connecting to {}...\n", url);

            let client = TweetStreamClient::new();
            let receiver = client.subscribe();
            client.connect(&url).await?;

            monitor.run(receiver, limit).await?
        }
        (None, Some(replay)) => {
            println!("\n📼 Replaying {:?}...\n", replay);

            let tweets = DataLoader::load_csv(&replay)?;
            let (sender, receiver) = broadcast::channel(1000);

            let simulator = StreamSimulator::new(tweets);
            let play = tokio::spawn(simulator.play(sender, None));

            let summary = monitor.run(receiver, limit).await?;
            play.await?;
            summary
        }
        (Some(_), Some(_)) => bail!("Use either --url or --replay, not both"),
        (None, None) => bail!("Provide --url for a live feed or --replay for a saved dataset"),
    };

    println!("\n{}", summary);
    println!("\n✅ Wrote label,confidence lines to {:?}", output);

    Ok(())
}

fn run_demo() -> Result<()> {
    println!("\n📝 Demo: training on a built-in corpus\n");

    let corpus = [
        (1, Sentiment::Positive, "I love this phone, the screen is amazing :)"),
        (2, Sentiment::Positive, "what a great match, so happy with the result"),
        (3, Sentiment::Positive, "best concert ever, totally worth it"),
        (4, Sentiment::Positive, "this new album is wonderful, love every song"),
        (5, Sentiment::Positive, "had an awesome day at the beach with friends"),
        (6, Sentiment::Negative, "I hate waiting in traffic, worst commute ever"),
        (7, Sentiment::Negative, "this update is terrible, everything is broken :("),
        (8, Sentiment::Negative, "awful service and the food was cold"),
        (9, Sentiment::Negative, "so disappointed with the ending, bad writing"),
        (10, Sentiment::Negative, "my flight got cancelled again, horrible airline"),
    ];

    let tweets: Vec<LabeledTweet> = corpus
        .iter()
        .map(|(id, sentiment, text)| LabeledTweet {
            id: *id,
            sentiment: *sentiment,
            text: text.to_string(),
        })
        .collect();

    let (tokenizer, preprocessor, vectorizer, x) = build_features(&tweets, 1);
    let y = label_vector(&tweets);

    let mut ensemble = VotingEnsemble::with_default_members();
    ensemble.fit(&x, &y)?;

    let bundle = ModelBundle::new(tokenizer, preprocessor, vectorizer, ensemble);

    let samples = [
        "I love this amazing day",
        "terrible broken service",
        "so happy with this wonderful phone",
        "worst flight, so disappointed",
    ];

    println!("Classifying sample texts:\n");
    for text in samples {
        let vote = bundle.classify(text)?;
        println!(
            "  [{:8} {:>5.1}%] {}",
            vote.label.to_string(),
            vote.confidence * 100.0,
            text
        );
    }

    Ok(())
}
