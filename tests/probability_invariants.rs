use bayes_core::classify::{Classifier, ClassifierError};
use bayes_core::model::{ModelError, OutcomeModel};
use bayes_core::types::{OutcomeId, Token};

fn tokens(words: &[&str]) -> Vec<Token> {
    words.iter().map(|w| Token::from(*w)).collect()
}

fn trained_three_way() -> Classifier {
    let mut classifier = Classifier::new([
        OutcomeId::from("news"),
        OutcomeId::from("sport"),
        OutcomeId::from("tech"),
    ])
    .unwrap();

    let news = OutcomeId::from("news");
    let sport = OutcomeId::from("sport");
    let tech = OutcomeId::from("tech");

    classifier.add_training_example(&news, &tokens(&["vote", "poll"])).unwrap();
    classifier.add_training_example(&news, &tokens(&["vote"])).unwrap();
    classifier.add_training_example(&sport, &tokens(&["goal", "match"])).unwrap();
    classifier.add_training_example(&tech, &tokens(&["chip", "vote"])).unwrap();

    classifier
}

#[test]
fn invariant_token_likelihood_stays_in_unit_interval() {
    let classifier = trained_three_way();

    for outcome in classifier.outcomes() {
        let model = classifier.outcome_model(outcome).unwrap();
        for word in ["vote", "poll", "goal", "match", "chip", "never-seen"] {
            let p = model
                .probability_token_given_outcome(&Token::from(word))
                .unwrap();
            assert!((0.0..=1.0).contains(&p), "P(T|O) = {p} out of range");
        }
    }
}

#[test]
fn invariant_priors_sum_to_one() {
    let classifier = trained_three_way();

    let sum: f64 = classifier
        .outcomes()
        .map(|outcome| classifier.probability_outcome(outcome).unwrap())
        .sum();

    assert!((sum - 1.0).abs() < 1e-9, "priors sum to {sum}, expected 1.0");
}

#[test]
fn untrained_outcome_model_refuses_likelihood_queries() {
    let model = OutcomeModel::new();

    let result = model.probability_token_given_outcome(&Token::from("anything"));
    assert_eq!(result, Err(ModelError::NoTrainingExamples));
}

#[test]
fn untrained_outcome_poisons_token_evidence_queries() {
    // One outcome trained, the other empty: the evidence sum over all
    // outcomes is undefined, and the call fails rather than guessing.
    let mut classifier =
        Classifier::new([OutcomeId::from("spam"), OutcomeId::from("ham")]).unwrap();
    let spam = OutcomeId::from("spam");

    classifier.add_training_example(&spam, &tokens(&["offer"])).unwrap();

    let result = classifier.probability_outcome_given_token(&Token::from("offer"), &spam);
    assert!(matches!(
        result,
        Err(ClassifierError::Model(ModelError::NoTrainingExamples))
    ));
}

#[test]
fn never_observed_token_carries_no_evidence() {
    let classifier = trained_three_way();
    let unseen = Token::from("zebra");

    for outcome in classifier.outcomes() {
        let p = classifier
            .probability_outcome_given_token(&unseen, outcome)
            .unwrap();
        assert_eq!(p, 0.0, "unseen token must yield 0.0 for {outcome}");
    }
}

#[test]
fn single_token_posteriors_follow_bayes_rule() {
    let classifier = trained_three_way();
    let vote = Token::from("vote");

    // Recompute P(O|T) by hand from the model counts.
    let total = classifier.total_count() as f64;
    let mut evidence = 0.0;
    for outcome in classifier.outcomes() {
        let model = classifier.outcome_model(outcome).unwrap();
        let likelihood = model.probability_token_given_outcome(&vote).unwrap();
        evidence += likelihood * (model.count() as f64 / total);
    }

    for outcome in classifier.outcomes() {
        let model = classifier.outcome_model(outcome).unwrap();
        let likelihood = model.probability_token_given_outcome(&vote).unwrap();
        let prior = model.count() as f64 / total;
        let expected = likelihood * prior / evidence;

        let actual = classifier
            .probability_outcome_given_token(&vote, outcome)
            .unwrap();
        assert!((actual - expected).abs() < 1e-12);
    }
}
