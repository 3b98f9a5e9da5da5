/*!

This is the long-form manual for `panel_scoring` and `panelscore`.

## Scoring rules

Every expert gives each team a score between 0 and 10 in every category.
For one team and one category, the scores are combined as follows:

1. Zeros are dropped. A zero means "not scored", never a very low score.
   If nothing is left, the category average is 0.
2. If only one score is left, it is the average.
3. If three or more scores are left, the single lowest and the single highest
   scores are dropped. Only one pair is dropped, however many experts there are.
4. The average is the mean of the remaining scores.

| scores             | average |
|--------------------|---------|
| `0, 0, 0`          | 0       |
| `5`                | 5       |
| `4, 6`             | 5       |
| `1, 5, 9`          | 5       |
| `0, 4, 6, 8`       | 6       |
| `2, 4, 6, 8, 10`   | 6       |

The total of a team is the **sum** of its category averages: each category is
a bucket of points. A team that received no score at all is still listed, with
a total of 0.

Teams are sorted by decreasing total. Ties are broken with the `tiebreakMode`
option:
* `useTeamOrder` (default): the team with the lower order number first, then
  the lower id.
* `random`: a permutation derived from `randomSeed` and a cryptographic hash of
  the team names. The same seed always gives the same order.

An expert submitting a second score for the same team and category replaces
the first one.

## Input formats

### `csv`

One score per row. The columns are configured with the `...ColumnIndex`
options; by default:

```text
team,expert,category,score
Red,Judge 1,Innovation,7.5
Red,Judge 2,Innovation,8
```

Teams, experts and categories can be referred to by id or by name. The first
row is skipped by default (see `firstScoreRowIndex`).

### `xlsx`

Same layout as `csv`, in an Excel worksheet. Use `excelWorksheetName` when the
workbook has more than one worksheet.

### `json`

The rows as they would be submitted to a scoring service:

```text
[ {"team_id": 1, "expert_id": 2, "category_id": 1, "score": 7.5} ]
```

## Configuration

```text
{
  "outputSettings": { "contestName": "Hackathon finals", "contestDate": "2024-05-01" },
  "scoreFileSources": [ { "provider": "csv", "filePath": "scores.csv" } ],
  "teams": [ { "id": 1, "name": "Red", "orderNumber": 1 } ],
  "experts": [ { "id": 1, "name": "Judge 1" } ],
  "categories": [ { "id": 1, "name": "Innovation" } ],
  "rules": { "tiebreakMode": "useTeamOrder" }
}
```

File paths are relative to the configuration file. Indexes start at 1 and can
also be written as Excel columns (`"A"`, `"B"`, ...).

Without a configuration file, the teams, experts and categories are taken from
the score sheet, in the order they first appear. Numeric labels are used as
ids; the other labels are numbered after the highest numeric label.

 */
