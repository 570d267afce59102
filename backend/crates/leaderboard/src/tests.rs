//! Unit tests for the leaderboard crate
//!
//! Use cases run against the in-memory repository, which enforces the same
//! constraints as the PostgreSQL implementation.

use crate::application::create_level::{CreateLevelInput, CreateLevelUseCase};
use crate::application::create_team::{CreateTeamInput, CreateTeamUseCase};
use crate::application::join_team::{JoinTeamInput, JoinTeamUseCase};
use crate::application::leave_team::LeaveTeamUseCase;
use crate::application::progress::{TeamProgress, TeamProgressUseCase};
use crate::application::submit_answer::{SubmitAnswerInput, SubmitAnswerUseCase};
use crate::domain::entities::{Level, Team, TeamMember};
use crate::domain::repository::{
    LevelRepository, SubmissionRepository, TeamRepository,
};
use crate::domain::value_objects::{LevelName, MAX_MEMBERS_PER_TEAM, TeamName};
use crate::error::LeaderboardError;
use crate::infra::memory::MemoryLeaderboardRepository;
use kernel::id::UserId;
use std::sync::Arc;

fn random_alphabetic() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..10).map(|_| rng.random_range(b'a'..=b'z') as char).collect()
}

fn new_user() -> UserId {
    UserId::new()
}

fn repo() -> Arc<MemoryLeaderboardRepository> {
    Arc::new(MemoryLeaderboardRepository::new())
}

async fn new_team(repo: &MemoryLeaderboardRepository) -> Team {
    let team = Team::new(TeamName::new(random_alphabetic()).unwrap());
    TeamRepository::create(repo, &team).await.unwrap();
    team
}

async fn add_member(
    repo: &MemoryLeaderboardRepository,
    team: &Team,
    user_id: UserId,
) -> Result<(), LeaderboardError> {
    repo.add_member(team, &TeamMember::new(team.id, user_id))
        .await
}

async fn new_level(repo: &MemoryLeaderboardRepository, answer: &str) -> Level {
    let level = Level::new(LevelName::new(random_alphabetic()).unwrap(), answer);
    LevelRepository::create(repo, &level).await.unwrap();
    level
}

fn progress_use_case(
    repo: &Arc<MemoryLeaderboardRepository>,
) -> TeamProgressUseCase<
    MemoryLeaderboardRepository,
    MemoryLeaderboardRepository,
    MemoryLeaderboardRepository,
> {
    TeamProgressUseCase::new(repo.clone(), repo.clone(), repo.clone())
}

async fn progress_of(repo: &Arc<MemoryLeaderboardRepository>, team: &Team) -> TeamProgress {
    progress_use_case(repo).for_team(team.clone()).await.unwrap()
}

async fn submit(
    repo: &Arc<MemoryLeaderboardRepository>,
    team: &Team,
    attempt: &str,
) -> Result<bool, LeaderboardError> {
    let progress = progress_of(repo, team).await;
    let use_case = SubmitAnswerUseCase::new(repo.clone());
    use_case
        .execute(
            &progress,
            SubmitAnswerInput {
                answer_attempt: attempt.to_string(),
            },
        )
        .await
        .map(|out| out.passed)
}

mod team_tests {
    use super::*;

    #[tokio::test]
    async fn test_can_create_teams_up_to_capacity() {
        let repo = repo();

        for _ in 0..3 {
            let team = new_team(&repo).await;
            for _ in 0..MAX_MEMBERS_PER_TEAM {
                add_member(&repo, &team, new_user()).await.unwrap();
            }
            assert_eq!(
                repo.member_count(team.id).await.unwrap(),
                MAX_MEMBERS_PER_TEAM
            );
        }
    }

    #[tokio::test]
    async fn test_cannot_add_more_members_than_max() {
        let repo = repo();
        let team = new_team(&repo).await;
        for _ in 0..MAX_MEMBERS_PER_TEAM {
            add_member(&repo, &team, new_user()).await.unwrap();
        }

        let err = add_member(&repo, &team, new_user()).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::TeamFull(_)));
        // The capacity error names the team
        assert_eq!(
            err.to_string(),
            format!("Team '{}' is not accepting members", team.name)
        );
        assert_eq!(
            repo.member_count(team.id).await.unwrap(),
            MAX_MEMBERS_PER_TEAM
        );
    }

    #[tokio::test]
    async fn test_concurrent_joins_never_exceed_capacity() {
        let repo = repo();
        let team = new_team(&repo).await;

        // Eight users race for four slots; exactly four get in
        let mut joins = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let repo = repo.clone();
            let team_id = team.id;
            joins.spawn(async move {
                JoinTeamUseCase::new(repo)
                    .execute(JoinTeamInput { team_id }, new_user())
                    .await
            });
        }

        let mut admitted: i64 = 0;
        let mut rejected: i64 = 0;
        while let Some(result) = joins.join_next().await {
            match result.unwrap() {
                Ok(_) => admitted += 1,
                Err(LeaderboardError::TeamFull(_)) => rejected += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(admitted, MAX_MEMBERS_PER_TEAM);
        assert_eq!(rejected, 8 - MAX_MEMBERS_PER_TEAM);
        assert_eq!(
            repo.member_count(team.id).await.unwrap(),
            MAX_MEMBERS_PER_TEAM
        );
    }

    #[tokio::test]
    async fn test_cannot_add_same_member_twice() {
        let repo = repo();
        let team = new_team(&repo).await;
        let user = new_user();

        add_member(&repo, &team, user).await.unwrap();
        let err = add_member(&repo, &team, user).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::AlreadyOnTeam));
    }

    #[tokio::test]
    async fn test_same_user_cannot_join_multiple_teams() {
        let repo = repo();
        let user = new_user();

        let team1 = new_team(&repo).await;
        add_member(&repo, &team1, user).await.unwrap();

        let team2 = new_team(&repo).await;
        let err = add_member(&repo, &team2, user).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::AlreadyOnTeam));
    }

    #[tokio::test]
    async fn test_remove_last_member_deletes_team() {
        let repo = repo();
        let user = new_user();
        let team = new_team(&repo).await;
        add_member(&repo, &team, user).await.unwrap();

        repo.remove_member(team.id, user).await.unwrap();

        assert!(repo.find_by_id(team.id).await.unwrap().is_none());
        assert!(repo.find_by_member(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_non_last_member_keeps_team() {
        let repo = repo();
        let leaver = new_user();
        let stayer = new_user();
        let team = new_team(&repo).await;
        add_member(&repo, &team, leaver).await.unwrap();
        add_member(&repo, &team, stayer).await.unwrap();

        repo.remove_member(team.id, leaver).await.unwrap();

        assert!(repo.find_by_id(team.id).await.unwrap().is_some());
        assert_eq!(repo.member_count(team.id).await.unwrap(), 1);
        assert!(repo.find_by_member(stayer).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove_absent_member_is_noop() {
        let repo = repo();
        let team = new_team(&repo).await;
        add_member(&repo, &team, new_user()).await.unwrap();

        repo.remove_member(team.id, new_user()).await.unwrap();
        assert_eq!(repo.member_count(team.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_team_use_case_adds_founder() {
        let repo = repo();
        let user = new_user();
        let use_case = CreateTeamUseCase::new(repo.clone());

        let team = use_case
            .execute(
                CreateTeamInput {
                    name: "foo".to_string(),
                },
                user,
            )
            .await
            .unwrap();

        assert_eq!(team.name.as_str(), "foo");
        assert_eq!(repo.member_count(team.id).await.unwrap(), 1);
        let directory_hit = repo.find_by_member(user).await.unwrap().unwrap();
        assert_eq!(directory_hit.id, team.id);
    }

    #[tokio::test]
    async fn test_create_team_rejects_empty_name() {
        let repo = repo();
        let use_case = CreateTeamUseCase::new(repo.clone());

        let err = use_case
            .execute(
                CreateTeamInput {
                    name: "   ".to_string(),
                },
                new_user(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_team_rejects_user_already_on_team() {
        let repo = repo();
        let user = new_user();
        let use_case = CreateTeamUseCase::new(repo.clone());

        let first = use_case
            .execute(
                CreateTeamInput {
                    name: "first".to_string(),
                },
                user,
            )
            .await
            .unwrap();

        let err = use_case
            .execute(
                CreateTeamInput {
                    name: "second".to_string(),
                },
                user,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::AlreadyOnTeam));

        // The rejection happens before any insert; the user's team is intact
        let still = repo.find_by_member(user).await.unwrap().unwrap();
        assert_eq!(still.id, first.id);
    }

    #[tokio::test]
    async fn test_duplicate_team_names_are_permitted() {
        let repo = repo();
        let use_case = CreateTeamUseCase::new(repo.clone());

        let input = CreateTeamInput {
            name: "clones".to_string(),
        };
        let a = use_case.execute(input.clone(), new_user()).await.unwrap();
        let b = use_case.execute(input, new_user()).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, b.name);
    }

    #[tokio::test]
    async fn test_join_unknown_team_fails() {
        let repo = repo();
        let use_case = JoinTeamUseCase::new(repo.clone());

        let err = use_case
            .execute(
                JoinTeamInput {
                    team_id: kernel::id::TeamId::new(),
                },
                new_user(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::TeamNotFound));
    }

    #[tokio::test]
    async fn test_leave_without_team_is_noop() {
        let repo = repo();
        let use_case = LeaveTeamUseCase::new(repo.clone());
        use_case.execute(new_user()).await.unwrap();
    }

    #[tokio::test]
    async fn test_leave_team_use_case_cascades_history() {
        let repo = repo();
        let user = new_user();
        let team = new_team(&repo).await;
        add_member(&repo, &team, user).await.unwrap();
        new_level(&repo, "flag").await;
        assert!(submit(&repo, &team, "flag").await.unwrap());
        assert_eq!(repo.count_for_team(team.id).await.unwrap(), 1);

        LeaveTeamUseCase::new(repo.clone())
            .execute(user)
            .await
            .unwrap();

        assert!(repo.find_by_id(team.id).await.unwrap().is_none());
        assert_eq!(repo.count_for_team(team.id).await.unwrap(), 0);
    }
}

mod directory_tests {
    use super::*;

    #[tokio::test]
    async fn test_find_team_by_member() {
        let repo = repo();
        let user = new_user();
        assert!(repo.find_by_member(user).await.unwrap().is_none());

        let team = new_team(&repo).await;
        add_member(&repo, &team, user).await.unwrap();

        let found = repo.find_by_member(user).await.unwrap().unwrap();
        assert_eq!(found.id, team.id);

        // An unrelated user is still teamless
        assert!(repo.find_by_member(new_user()).await.unwrap().is_none());
    }
}

mod submission_tests {
    use super::*;

    #[tokio::test]
    async fn test_cannot_submit_when_team_is_empty() {
        let repo = repo();
        let team = new_team(&repo).await;
        new_level(&repo, "flag").await;

        let progress = progress_of(&repo, &team).await;
        assert!(progress.is_empty());
        assert!(!progress.can_submit());

        // Levels existing makes no difference for an empty team
        let err = submit(&repo, &team, "flag").await.unwrap_err();
        assert!(matches!(err, LeaderboardError::CannotSubmit));
        assert_eq!(repo.count_for_team(team.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cannot_submit_without_levels() {
        let repo = repo();
        let team = new_team(&repo).await;
        add_member(&repo, &team, new_user()).await.unwrap();

        let progress = progress_of(&repo, &team).await;
        assert!(!progress.can_submit());
        assert!(progress.next_level.is_none());

        let err = submit(&repo, &team, "anything").await.unwrap_err();
        assert!(matches!(err, LeaderboardError::CannotSubmit));
    }

    #[tokio::test]
    async fn test_submit_fails_for_incorrect_answer() {
        let repo = repo();
        let team = new_team(&repo).await;
        add_member(&repo, &team, new_user()).await.unwrap();
        new_level(&repo, "correct").await;

        // Rejection is idempotent: repeats never move the index or write rows
        for _ in 0..3 {
            assert!(!submit(&repo, &team, "incorrect").await.unwrap());
            let progress = progress_of(&repo, &team).await;
            assert_eq!(progress.next_level_index(), 0);
            assert_eq!(repo.count_for_team(team.id).await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_attempt() {
        let repo = repo();
        let team = new_team(&repo).await;
        add_member(&repo, &team, new_user()).await.unwrap();
        new_level(&repo, "flag").await;

        let err = submit(&repo, &team, "").await.unwrap_err();
        assert!(matches!(err, LeaderboardError::Validation(_)));
        assert_eq!(repo.count_for_team(team.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_accepts_correct_answer() {
        let repo = repo();
        let answer = random_alphabetic();
        let level = new_level(&repo, &answer).await;

        let team = new_team(&repo).await;
        add_member(&repo, &team, new_user()).await.unwrap();

        let progress = progress_of(&repo, &team).await;
        assert_eq!(progress.next_level_index(), 0);
        assert!(progress.can_submit());
        assert_eq!(progress.next_level.as_ref().unwrap().id, level.id);

        assert!(submit(&repo, &team, &answer).await.unwrap());

        let progress = progress_of(&repo, &team).await;
        assert_eq!(progress.next_level_index(), 1);
        assert!(!progress.can_submit());
        assert!(progress.next_level.is_none());
        assert!(progress.completed());
    }

    #[tokio::test]
    async fn test_submit_accepts_correct_answer_sequence() {
        let repo = repo();
        let answers: Vec<String> = (0..6).map(|_| random_alphabetic()).collect();
        for answer in &answers {
            new_level(&repo, answer).await;
        }

        let team = new_team(&repo).await;
        add_member(&repo, &team, new_user()).await.unwrap();

        for (i, answer) in answers.iter().enumerate() {
            let progress = progress_of(&repo, &team).await;
            assert_eq!(progress.next_level_index(), i as i64);
            assert!(progress.can_submit());
            assert!(progress.next_level.is_some());

            assert!(submit(&repo, &team, answer).await.unwrap());

            // Progression always equals the ledger count
            let progress = progress_of(&repo, &team).await;
            assert_eq!(progress.next_level_index(), i as i64 + 1);
            assert_eq!(
                progress.next_level_index(),
                repo.count_for_team(team.id).await.unwrap()
            );
        }

        let progress = progress_of(&repo, &team).await;
        assert!(!progress.can_submit());
        assert!(progress.next_level.is_none());
        assert!(progress.completed());
    }

    #[tokio::test]
    async fn test_duplicate_correct_submission_is_benign() {
        let repo = repo();
        let answer = random_alphabetic();
        new_level(&repo, &answer).await;

        let team = new_team(&repo).await;
        add_member(&repo, &team, new_user()).await.unwrap();

        // Two teammates race with the same stale progress snapshot
        let stale = progress_of(&repo, &team).await;
        let use_case = SubmitAnswerUseCase::new(repo.clone());

        let first = use_case
            .execute(
                &stale,
                SubmitAnswerInput {
                    answer_attempt: answer.clone(),
                },
            )
            .await
            .unwrap();
        let second = use_case
            .execute(
                &stale,
                SubmitAnswerInput {
                    answer_attempt: answer,
                },
            )
            .await
            .unwrap();

        assert!(first.passed);
        assert!(second.passed);
        // Only one row in the ledger, progression advanced exactly once
        assert_eq!(repo.count_for_team(team.id).await.unwrap(), 1);
    }
}

mod level_tests {
    use super::*;

    #[tokio::test]
    async fn test_cannot_create_level_with_same_name() {
        let repo = repo();
        let use_case = CreateLevelUseCase::new(repo.clone());

        use_case
            .execute(CreateLevelInput {
                name: "foo".to_string(),
                answer: "bar".to_string(),
            })
            .await
            .unwrap();

        let err = use_case
            .execute(CreateLevelInput {
                name: "foo".to_string(),
                answer: "baz".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::DuplicateLevel(_)));
    }

    #[tokio::test]
    async fn test_cannot_create_level_with_same_answer() {
        let repo = repo();
        let use_case = CreateLevelUseCase::new(repo.clone());

        use_case
            .execute(CreateLevelInput {
                name: "foo".to_string(),
                answer: "bar".to_string(),
            })
            .await
            .unwrap();

        // Different name, same plaintext answer: same digest, rejected
        let err = use_case
            .execute(CreateLevelInput {
                name: "baz".to_string(),
                answer: "bar".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::DuplicateLevel(_)));
    }

    #[tokio::test]
    async fn test_level_order_is_creation_order() {
        let repo = repo();
        let first = new_level(&repo, "a1").await;
        let second = new_level(&repo, "a2").await;
        let third = new_level(&repo, "a3").await;

        assert_eq!(LevelRepository::count(repo.as_ref()).await.unwrap(), 3);
        assert_eq!(repo.at(0).await.unwrap().unwrap().id, first.id);
        assert_eq!(repo.at(1).await.unwrap().unwrap().id, second.id);
        assert_eq!(repo.at(2).await.unwrap().unwrap().id, third.id);
        assert!(repo.at(3).await.unwrap().is_none());
        assert!(repo.at(-1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_level_validates_input() {
        let repo = repo();
        let use_case = CreateLevelUseCase::new(repo.clone());

        let err = use_case
            .execute(CreateLevelInput {
                name: "".to_string(),
                answer: "bar".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::Validation(_)));

        let err = use_case
            .execute(CreateLevelInput {
                name: "foo".to_string(),
                answer: "".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::Validation(_)));
    }
}

mod server_tests {
    use super::*;
    use crate::application::servers::{
        ListServersUseCase, RegisterServerInput, RegisterServerUseCase,
    };

    #[tokio::test]
    async fn test_register_and_list_servers() {
        let repo = repo();
        let register = RegisterServerUseCase::new(repo.clone());

        register
            .execute(RegisterServerInput {
                ip_address: "10.0.0.1".to_string(),
            })
            .await
            .unwrap();
        register
            .execute(RegisterServerInput {
                ip_address: "fd00::1".to_string(),
            })
            .await
            .unwrap();

        let servers = ListServersUseCase::new(repo.clone()).execute().await.unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].ip_address.to_string(), "10.0.0.1");
        assert_eq!(servers[1].ip_address.to_string(), "fd00::1");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_ip() {
        let repo = repo();
        let register = RegisterServerUseCase::new(repo.clone());

        let err = register
            .execute(RegisterServerInput {
                ip_address: "not-an-ip".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::Validation(_)));
    }
}
